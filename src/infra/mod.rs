pub mod rdw;
