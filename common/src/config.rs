//! This is the `ConfigFile` struct.
//!
//! This is for finding the right default locations for the configuration files of the
//! soil transect tools.  This is a configuration file/struct neutral loading engine, storing
//! only the base directory and with `load()` read the proper file or the default one.
//!
//! This encapsulates the configuration file, available with `.inner()` or `.into_inner()`.
//!

use std::fmt::Debug;
use std::fs;
use std::path::PathBuf;

use directories::BaseDirs;
use eyre::Result;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::{makepath, ConfigError};

/// Main name for the directory base
const TAG: &str = "soil-transect";

/// Every configuration file carries a version number.
///
pub trait Versioned {
    /// Version found in the file
    fn version(&self) -> usize;
    /// Version this code knows how to read
    fn expected() -> usize;
}

/// Configuration file for one of the tools.
///
#[derive(Debug)]
pub struct ConfigFile<T: Debug + DeserializeOwned + Versioned> {
    /// This is the base directory for all files.
    basedir: PathBuf,
    /// Actual file
    path: PathBuf,
    inner: T,
}

impl<T> ConfigFile<T>
where
    T: Debug + DeserializeOwned + Versioned,
{
    /// Returns the path of the default config directory
    ///
    /// `$HOME/.config/soil-transect` on UNIX, `%LOCALAPPDATA%\soil-transect` on Windows.
    ///
    #[tracing::instrument]
    pub fn config_path() -> PathBuf {
        match BaseDirs::new() {
            Some(base) => {
                #[cfg(unix)]
                let base = base.home_dir().join(".config");

                #[cfg(windows)]
                let base = base.data_local_dir().to_path_buf();

                debug!("base = {base:?}");
                makepath!(base, TAG)
            }
            None => makepath!(".", TAG),
        }
    }

    /// Returns the path of the default config file
    ///
    #[tracing::instrument]
    pub fn default_file(name: &str) -> PathBuf {
        let cfg = Self::config_path().join(name);
        debug!("default = {cfg:?}");
        cfg
    }

    /// Load the file and return a struct T in the right format.
    ///
    /// Use the following search path:
    /// - file specified on CLI
    /// - default basedir (base on $HOME or $LOCALAPPDATA)
    ///
    #[tracing::instrument]
    pub fn load(fname: Option<&str>, name: &str) -> Result<ConfigFile<T>> {
        trace!("enter");

        let basedir = Self::config_path();
        let fname = match fname {
            Some(fname) => PathBuf::from(fname),
            None => Self::default_file(name),
        };

        if !fname.exists() {
            return Err(ConfigError::MissingConfig(
                fname.to_string_lossy().to_string(),
                basedir.to_string_lossy().to_string(),
            )
            .into());
        }
        let path = fname.canonicalize()?;
        trace!("Loading config file {path:?}");

        let data = fs::read_to_string(&path)?;
        let inner = Self::parse_str(&data)?;

        Ok(ConfigFile {
            basedir,
            path,
            inner,
        })
    }

    /// Parse and check the version of an in-memory configuration.
    ///
    pub fn parse_str(data: &str) -> Result<T> {
        let inner: T = hcl::from_str(data)?;
        debug!("struct data = {inner:?}");

        if inner.version() != T::expected() {
            return Err(ConfigError::BadFileVersion(inner.version(), T::expected()).into());
        }
        Ok(inner)
    }

    /// Where was it loaded from
    ///
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn basedir(&self) -> &PathBuf {
        &self.basedir
    }

    /// Return the inner configuration file
    ///
    pub fn inner(&self) -> &T {
        &self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;

    #[derive(Debug, Default, Deserialize)]
    struct Foo {
        version: usize,
        pub name: String,
    }

    impl Versioned for Foo {
        fn version(&self) -> usize {
            self.version
        }

        fn expected() -> usize {
            1
        }
    }

    #[test]
    fn test_config_parse_str() -> Result<()> {
        let cfg = ConfigFile::<Foo>::parse_str("version = 1\nname = \"transect\"\n")?;
        assert_eq!(1, cfg.version());
        assert_eq!("transect", cfg.name);
        Ok(())
    }

    #[test]
    fn test_config_bad_version() {
        let cfg = ConfigFile::<Foo>::parse_str("version = 2\nname = \"transect\"\n");
        assert!(cfg.is_err());
    }

    #[test]
    fn test_config_load_file() -> Result<()> {
        let dir = std::env::temp_dir().join(format!("transect-cfg-{}", std::process::id()));
        fs::create_dir_all(&dir)?;
        let fname = dir.join("foo.hcl");
        let mut fh = fs::File::create(&fname)?;
        writeln!(fh, "version = 1")?;
        writeln!(fh, "name = \"local\"")?;
        drop(fh);

        let cfg = ConfigFile::<Foo>::load(fname.to_str(), "foo.hcl")?;
        assert_eq!("local", cfg.inner().name);
        assert!(cfg.path().ends_with("foo.hcl"));

        fs::remove_dir_all(&dir)?;
        Ok(())
    }

    #[test]
    fn test_config_missing_file() {
        let cfg = ConfigFile::<Foo>::load(Some("/nonexistent/foo.hcl"), "foo.hcl");
        assert!(cfg.is_err());
    }

    #[test]
    fn test_config_path() {
        let p = ConfigFile::<Foo>::default_file("foo.hcl");
        assert!(p.ends_with("soil-transect/foo.hcl"));
    }
}
