use std::path::Path;
use tracing::debug;
use wpadproxy_domain::{DomainError, ResolvConf};

const RESOLV_CONF_PATH: &str = "/etc/resolv.conf";

pub fn load() -> Result<ResolvConf, DomainError> {
    load_from(Path::new(RESOLV_CONF_PATH))
}

pub fn load_from(path: &Path) -> Result<ResolvConf, DomainError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| DomainError::IoError(format!("{}: {e}", path.display())))?;
    let conf = ResolvConf::parse(&content);
    debug!(
        nameservers = conf.nameservers.len(),
        search_groups = conf.search.len(),
        "resolv.conf parsed"
    );
    Ok(conf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_and_parses_a_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "nameserver 192.168.1.1").unwrap();
        writeln!(file, "search corp.example.com example.com").unwrap();
        file.flush().unwrap();

        let conf = load_from(file.path()).unwrap();
        assert_eq!(conf.nameservers, vec!["192.168.1.1"]);
        assert_eq!(conf.search_domains(), vec!["corp.example.com", "example.com"]);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_from(Path::new("/nonexistent/resolv.conf")).is_err());
    }
}
