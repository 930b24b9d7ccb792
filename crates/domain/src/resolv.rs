/// Parsed view of a `resolv.conf`-style file.
///
/// Each `search` line keeps its suffix tokens together as one ordered group;
/// `nameserver` lines contribute their last whitespace-separated field.
/// Everything else, including short or malformed lines, is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvConf {
    pub nameservers: Vec<String>,
    pub search: Vec<Vec<String>>,
}

impl ResolvConf {
    pub fn parse(content: &str) -> Self {
        let mut conf = ResolvConf::default();
        for line in content.lines() {
            let fields: Vec<&str> = line.split_whitespace().collect();
            match fields.first() {
                Some(&"nameserver") if fields.len() >= 2 => {
                    conf.nameservers.push(fields[fields.len() - 1].to_string());
                }
                Some(&"search") if fields.len() >= 2 => {
                    conf.search
                        .push(fields[1..].iter().map(|s| s.to_string()).collect());
                }
                _ => {}
            }
        }
        conf
    }

    /// Flatten the search groups into one ordered suffix list.
    pub fn search_domains(&self) -> Vec<String> {
        self.search.iter().flatten().cloned().collect()
    }
}
