use super::LogError;
use log::LevelFilter;
use log4rs::config::Logger;
use std::{collections::BTreeMap, str::FromStr};

/// Parsed `RUST_LOG`-style filter expression, e.g. `info,genix_consensus=debug`.
///
/// A bare level sets the root level; `target=level` overrides a single module.
/// A bare target without a level enables everything for that target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogFilters {
    root: LevelFilter,
    targets: BTreeMap<String, LevelFilter>,
}

impl Default for LogFilters {
    fn default() -> Self {
        Self { root: LevelFilter::Info, targets: BTreeMap::new() }
    }
}

impl LogFilters {
    /// Lenient parse: malformed entries are reported on stdout and skipped.
    pub fn parse_lenient(expression: &str) -> Self {
        let mut filters = Self::default();
        for entry in expression.split(',').map(str::trim).filter(|x| !x.is_empty()) {
            if let Err(err) = filters.apply_entry(entry) {
                println!("Ignoring invalid logging spec: {err}");
            }
        }
        filters
    }

    pub fn root_level(&self) -> LevelFilter {
        self.root
    }

    pub fn target_level(&self, target: &str) -> Option<LevelFilter> {
        self.targets.get(target).copied()
    }

    pub(super) fn loggers(&self, appenders: &[&'static str]) -> Vec<Logger> {
        self.targets
            .iter()
            .map(|(name, level)| Logger::builder().appenders(appenders.iter().map(|x| x.to_string())).build(name.clone(), *level))
            .collect()
    }

    fn apply_entry(&mut self, entry: &str) -> Result<(), LogError> {
        let mut parts = entry.splitn(2, '=');
        let head = parts.next().unwrap_or_default().trim();
        match parts.next().map(str::trim) {
            None => match head.parse::<LevelFilter>() {
                Ok(level) => self.root = level,
                Err(_) => {
                    self.targets.insert(head.to_owned(), LevelFilter::max());
                }
            },
            Some("") => {
                self.targets.insert(head.to_owned(), LevelFilter::max());
            }
            Some(level) => {
                if head.is_empty() {
                    return Err(LogError::ParseFilter(entry.to_owned()));
                }
                let level = level.parse::<LevelFilter>().map_err(|_| LogError::ParseFilter(entry.to_owned()))?;
                self.targets.insert(head.to_owned(), level);
            }
        }
        Ok(())
    }
}

impl FromStr for LogFilters {
    type Err = LogError;

    /// Strict parse: the first malformed entry fails the whole expression.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut filters = Self::default();
        for entry in s.split(',').map(str::trim).filter(|x| !x.is_empty()) {
            filters.apply_entry(entry)?;
        }
        Ok(filters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_parse() {
        struct Test {
            name: &'static str,
            expr: &'static str,
            root: LevelFilter,
            targets: Vec<(&'static str, LevelFilter)>,
        }

        let tests = vec![
            Test { name: "empty expression keeps defaults", expr: "", root: LevelFilter::Info, targets: vec![] },
            Test { name: "root only", expr: "warn", root: LevelFilter::Warn, targets: vec![] },
            Test {
                name: "root and module override",
                expr: "debug, genix_consensus=trace",
                root: LevelFilter::Debug,
                targets: vec![("genix_consensus", LevelFilter::Trace)],
            },
            Test {
                name: "bare target enables everything",
                expr: "genix_consensus_core",
                root: LevelFilter::Info,
                targets: vec![("genix_consensus_core", LevelFilter::Trace)],
            },
            Test {
                name: "empty level enables everything",
                expr: "error,genixd=",
                root: LevelFilter::Error,
                targets: vec![("genixd", LevelFilter::Trace)],
            },
        ];

        for test in tests {
            let filters: LogFilters = test.expr.parse().unwrap();
            assert_eq!(filters.root_level(), test.root, "{}: root level", test.name);
            for (target, level) in test.targets {
                assert_eq!(filters.target_level(target), Some(level), "{}: level of {}", test.name, target);
            }
        }
    }

    #[test]
    fn test_filters_invalid_entries() {
        assert!("info,genixd=loud".parse::<LogFilters>().is_err());
        assert!("=debug".parse::<LogFilters>().is_err());

        let filters = LogFilters::parse_lenient("warn,genixd=loud,genix_consensus=debug");
        assert_eq!(filters.root_level(), LevelFilter::Warn);
        assert_eq!(filters.target_level("genixd"), None);
        assert_eq!(filters.target_level("genix_consensus"), Some(LevelFilter::Debug));
    }
}
