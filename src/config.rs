use std::env;
use std::str::FromStr;

/// Returns the value of the named environment variable if it exists or panics.
pub fn get_variable(name: &str) -> String {
    env::var(name).unwrap_or_else(|_| panic!("must define {} environment variable", name))
}

/// Returns the value of the named environment variable, or `default`
/// when it is unset.
pub fn get_optional_variable(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_owned())
}

/// Which `Db` implementation backs the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" => Ok(StoreKind::Postgres),
            "memory" => Ok(StoreKind::Memory),
            other => Err(format!("unknown store kind {:?}", other)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::StoreKind;

    #[test]
    fn store_kinds_parse() {
        assert_eq!("postgres".parse(), Ok(StoreKind::Postgres));
        assert_eq!(" Memory ".parse(), Ok(StoreKind::Memory));
        assert!("mongodb".parse::<StoreKind>().is_err());
    }
}
