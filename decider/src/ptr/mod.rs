mod volatile;

pub use self::volatile::Volatile;
