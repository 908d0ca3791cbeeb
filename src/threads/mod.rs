pub mod binder;

pub use binder::ThreadBinder;
