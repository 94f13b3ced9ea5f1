use regex::Regex;
use std::fmt::Display;
use thiserror::Error;

pub(crate) fn type_name<T: ?Sized>() -> String {
    let name = std::any::type_name::<T>();

    let regex = Regex::new("[a-z][A-Za-z0-9_]+::").expect("Regex compiles");
    regex.replace_all(name, "").to_string()
}

/// A configuration error, raised synchronously when a binding call is misused.
///
/// Nothing is subscribed or registered when one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    #[error("{0}")]
    NotAnOwner(NotAnOwnerError),

    #[error("{0}")]
    MissingCapability(MissingCapabilityError),

    #[error("{0}")]
    MissingToken(MissingTokenError),
}

impl BindError {
    pub fn not_an_owner<Owner: ?Sized>() -> Self {
        Self::NotAnOwner(NotAnOwnerError::new::<Owner>())
    }

    pub fn missing_capability<Owner: ?Sized>() -> Self {
        Self::MissingCapability(MissingCapabilityError::new::<Owner>())
    }

    pub fn missing_token<Token: ?Sized>() -> Self {
        Self::MissingToken(MissingTokenError::new::<Token>())
    }

    /// A short stable label, used in the log line written when a binding is rejected
    pub fn as_label(&self) -> &'static str {
        match self {
            BindError::NotAnOwner(_) => "bind_not_an_owner",
            BindError::MissingCapability(_) => "bind_missing_capability",
            BindError::MissingToken(_) => "bind_missing_token",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no owner passed: pass `self` or another LifecycleOwner, expected < {owner} >")]
pub struct NotAnOwnerError {
    pub owner: String,
}

impl NotAnOwnerError {
    pub fn new<Owner: ?Sized>() -> Self {
        NotAnOwnerError {
            owner: type_name::<Owner>(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{owner} - missing lifecycle registry, embed a LifecycleOwner and return it from `lifecycle()`")]
pub struct MissingCapabilityError {
    pub owner: String,
}

impl MissingCapabilityError {
    pub fn new<Owner: ?Sized>() -> Self {
        MissingCapabilityError {
            owner: type_name::<Owner>(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("token < {token} > cannot be empty, consider using `subscribe_safely` instead")]
pub struct MissingTokenError {
    pub token: String,
}

impl MissingTokenError {
    pub fn new<Token: ?Sized>() -> Self {
        MissingTokenError {
            token: type_name::<Token>(),
        }
    }
}

/// The default upstream error carried through a stream's error channel.
///
/// Cloneable, so a multicast source can deliver the same failure to every subscriber.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    #[error("upstream failed: {0}")]
    Upstream(String),

    #[error("upstream closed")]
    Closed,
}

impl StreamError {
    pub fn msg<M: Display>(message: M) -> Self {
        Self::Upstream(message.to_string())
    }

    /// Converts any error into a stream error, keeping the full `anyhow` context chain
    pub fn from_err<Err: Into<anyhow::Error>>(err: Err) -> Self {
        let err: anyhow::Error = err.into();
        Self::Upstream(format!("{:#}", err))
    }
}

impl From<anyhow::Error> for StreamError {
    fn from(err: anyhow::Error) -> Self {
        Self::from_err(err)
    }
}
