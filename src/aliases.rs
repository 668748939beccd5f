// src/aliases.rs
//! Zeroizing wrappers for every secret the crate holds
//!
//! Wiped on drop, redacted in `Debug`. The only way at the bytes is
//! `expose_secret()`.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

macro_rules! secret_alias {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Zeroize, ZeroizeOnDrop)]
        pub struct $name(Vec<u8>);

        impl $name {
            pub fn new(bytes: Vec<u8>) -> Self {
                Self(bytes)
            }

            pub fn expose_secret(&self) -> &Vec<u8> {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(concat!(stringify!($name), "([REDACTED])"))
            }
        }
    };
}

secret_alias!(
    /// Process-lifetime input
    MasterSecret
);

secret_alias!(
    /// Derived per purpose (or for the legacy format); never persisted
    DerivedKey
);
