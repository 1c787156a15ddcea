pub mod cancel;

pub use self::cancel::CancellationToken;
