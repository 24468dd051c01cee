//! Tuning knobs that can be overridden from environment variables.
//!
//! An [`EnvParam`] couples the name of an environment variable with the textual form of its
//! default value. The value is parsed lazily, on first access, and cached for the lifetime of
//! the process. It is meant for internal parameters of the explanation pipeline (garbage
//! collection thresholds, SAT solver heuristics, ...) that do not deserve a command line flag.
//!
//! ```
//! use env_param::EnvParam;
//! static GC_THRESHOLD: EnvParam<usize> = EnvParam::new("XDD_DOC_GC_THRESHOLD", "4096");
//!
//! // not set in the environment: the default is used
//! assert_eq!(GC_THRESHOLD.get(), 4096);
//! assert_eq!(GC_THRESHOLD.name(), "XDD_DOC_GC_THRESHOLD");
//! ```
//!
//! A parameter may also be forced programmatically, as long as it has not been read yet.
//! Any later change of the environment variable is ignored.
//!
//! ```
//! use env_param::EnvParam;
//! static DECAY: EnvParam<f64> = EnvParam::new("XDD_DOC_DECAY", "0.95");
//!
//! DECAY.set(0.8);
//! assert_eq!(DECAY.get(), 0.8);
//! assert!(DECAY.try_set(0.5).is_err());
//! ```

use once_cell::sync::OnceCell;
use std::fmt::Debug;
use std::str::FromStr;

pub struct EnvParam<T> {
    value: OnceCell<T>,
    env: &'static str,
    default: &'static str,
}

impl<T> EnvParam<T> {
    /// Declares a parameter read from `env`, falling back to `default` when the variable is unset
    /// or cannot be parsed.
    pub const fn new(env: &'static str, default: &'static str) -> EnvParam<T> {
        EnvParam {
            value: OnceCell::new(),
            env,
            default,
        }
    }

    /// Name of the environment variable backing this parameter.
    pub fn name(&self) -> &'static str {
        self.env
    }

    /// Textual default value, as declared.
    pub fn default_value(&self) -> &'static str {
        self.default
    }
}

impl<T: FromStr> EnvParam<T> {
    fn parse_default(&self) -> T {
        match T::from_str(self.default) {
            Ok(v) => v,
            Err(_) => panic!("[env_param] {}: invalid default value \"{}\"", self.env, self.default),
        }
    }

    fn read(&self) -> T {
        match std::env::var(self.env) {
            Ok(raw) => match T::from_str(raw.trim()) {
                Ok(value) => value,
                Err(_) => {
                    tracing::warn!(
                        "could not parse \"{}\" for {}, using default \"{}\"",
                        raw,
                        self.env,
                        self.default
                    );
                    self.parse_default()
                }
            },
            Err(std::env::VarError::NotPresent) => self.parse_default(),
            Err(err) => {
                tracing::warn!("{}: {}, using default \"{}\"", self.env, err, self.default);
                self.parse_default()
            }
        }
    }

    /// Returns the value of the parameter, reading the environment on the first call.
    ///
    /// # Panic
    /// Panics if the declared default cannot be parsed.
    pub fn get(&self) -> T
    where
        T: Copy,
    {
        *self.get_ref()
    }

    /// Same as [`EnvParam::get`] for parameters that are not `Copy`.
    pub fn get_ref(&self) -> &T {
        self.value.get_or_init(|| self.read())
    }

    /// Forces the value of the parameter. Fails (returning the value) if it was already initialized,
    /// which typically means it was already read.
    pub fn try_set(&self, value: T) -> Result<(), T> {
        self.value.set(value)
    }

    /// Forces the value of the parameter.
    ///
    /// # Panic
    /// Panics if the parameter is already initialized.
    pub fn set(&self, value: T) {
        if self.try_set(value).is_err() {
            panic!("Parameter {} is already initialized (i.e. was previously accessed).", self.env);
        }
    }
}

impl<T: FromStr + Debug> Debug for EnvParam<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={:?}", self.env, self.get_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_environment_once() {
        static P: EnvParam<u32> = EnvParam::new("XDD_TEST_READS_ENV_ONCE", "3");
        std::env::set_var("XDD_TEST_READS_ENV_ONCE", " 12 ");
        assert_eq!(P.get(), 12);
        std::env::set_var("XDD_TEST_READS_ENV_ONCE", "40");
        assert_eq!(P.get(), 12);
    }

    #[test]
    fn unparsable_value_falls_back_to_default() {
        static P: EnvParam<bool> = EnvParam::new("XDD_TEST_UNPARSABLE", "true");
        std::env::set_var("XDD_TEST_UNPARSABLE", "maybe");
        assert!(P.get());
    }

    #[test]
    fn debug_shows_name_and_value() {
        static P: EnvParam<u8> = EnvParam::new("XDD_TEST_DEBUG_FMT", "7");
        assert_eq!(format!("{P:?}"), "XDD_TEST_DEBUG_FMT=7");
    }
}
