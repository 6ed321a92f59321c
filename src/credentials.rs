//! Sources for the login token sent with mutating gallery calls.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use std::path::PathBuf;

use crate::config::CredentialsConfig;
use crate::error::GalleryError;

/// Supplies the current login token on demand.
pub trait CredentialSource: Send + Sync {
    /// `Ok(None)` means no token is stored; callers send an empty one.
    fn token(&self) -> Result<Option<String>, GalleryError>;
}

/// Build the `Authorization` header value: `Basic base64(token + ":")`.
pub fn basic_auth_value(token: &str) -> String {
    format!("Basic {}", BASE64.encode(format!("{}:", token)))
}

/// Fixed token, mostly for scripting and tests.
pub struct StaticToken(pub Option<String>);

impl CredentialSource for StaticToken {
    fn token(&self) -> Result<Option<String>, GalleryError> {
        Ok(self.0.clone())
    }
}

/// Reads the token from a cookie jar file every time it is asked, so a
/// fresh login is picked up without restarting.
pub struct CookieJar {
    path: PathBuf,
    name: String,
}

impl CookieJar {
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }
}

impl CredentialSource for CookieJar {
    fn token(&self) -> Result<Option<String>, GalleryError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(find_cookie(&content, &self.name)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(GalleryError::Credential {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

/// Environment variable first, cookie jar second.
pub struct ConfiguredCredentials {
    env_var: String,
    jar: CookieJar,
}

impl ConfiguredCredentials {
    pub fn from_config(config: &CredentialsConfig) -> Self {
        Self {
            env_var: config.env_var.clone(),
            jar: CookieJar::new(&config.cookie_file, &config.cookie_name),
        }
    }
}

impl CredentialSource for ConfiguredCredentials {
    fn token(&self) -> Result<Option<String>, GalleryError> {
        if let Ok(token) = std::env::var(&self.env_var) {
            if !token.is_empty() {
                return Ok(Some(token));
            }
        }
        self.jar.token()
    }
}

/// Look up a cookie by name. Accepts Netscape `cookies.txt` rows
/// (7 tab-separated fields) and plain `name=value` lines; the last match wins.
fn find_cookie(content: &str, name: &str) -> Option<String> {
    let mut found = None;
    for line in content.lines() {
        let line = line.trim();
        // `#HttpOnly_` prefixed rows are real cookies, other `#` lines are comments
        let line = match line.strip_prefix("#HttpOnly_") {
            Some(rest) => rest,
            None if line.starts_with('#') || line.is_empty() => continue,
            None => line,
        };

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() == 7 {
            if fields[5] == name {
                found = Some(fields[6].to_string());
            }
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            if key.trim() == name {
                found = Some(value.trim().to_string());
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_auth_value() {
        assert_eq!(basic_auth_value("abc"), "Basic YWJjOg==");
        assert_eq!(basic_auth_value(""), "Basic Og==");
    }

    #[test]
    fn test_find_cookie_netscape_format() {
        let content = "# Netscape HTTP Cookie File\n\
                       localhost\tFALSE\t/\tFALSE\t0\tsession\txyz\n\
                       #HttpOnly_localhost\tFALSE\t/\tFALSE\t0\tlogin-token\tsecret\n";
        assert_eq!(find_cookie(content, "login-token").as_deref(), Some("secret"));
        assert_eq!(find_cookie(content, "session").as_deref(), Some("xyz"));
        assert_eq!(find_cookie(content, "missing"), None);
    }

    #[test]
    fn test_find_cookie_key_value_lines() {
        let content = "login-token = first\nother=1\nlogin-token=second\n";
        assert_eq!(find_cookie(content, "login-token").as_deref(), Some("second"));
    }

    #[test]
    fn test_cookie_jar_missing_file_is_no_token() {
        let dir = tempfile::tempdir().unwrap();
        let jar = CookieJar::new(dir.path().join("cookies.txt"), "login-token");
        assert_eq!(jar.token().unwrap(), None);
    }

    #[test]
    fn test_cookie_jar_reads_on_demand() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies.txt");
        let jar = CookieJar::new(&path, "login-token");

        std::fs::write(&path, "login-token=one\n").unwrap();
        assert_eq!(jar.token().unwrap().as_deref(), Some("one"));

        std::fs::write(&path, "login-token=two\n").unwrap();
        assert_eq!(jar.token().unwrap().as_deref(), Some("two"));
    }
}
