use std::env;

/// Process configuration, read once at startup from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Directory or HTTP base URL holding the yearly CSV files.
    pub data_source: String,
    pub metadata_file: String,
    pub start_year: i32,
    pub end_year: i32,
}

impl Config {
    pub fn from_env() -> Config {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8001".to_string())
            .parse()
            .expect("PORT must be a number");
        let data_source = env::var("DATA_SOURCE").unwrap_or_else(|_| "data".to_string());
        let metadata_file =
            env::var("METADATA_FILE").unwrap_or_else(|_| "2012~2023.csv".to_string());
        let start_year = env::var("START_YEAR")
            .unwrap_or_else(|_| "2012".to_string())
            .parse()
            .expect("START_YEAR must be a year");
        let end_year = env::var("END_YEAR")
            .unwrap_or_else(|_| "2023".to_string())
            .parse()
            .expect("END_YEAR must be a year");

        Config {
            port,
            data_source,
            metadata_file,
            start_year,
            end_year,
        }
    }

    /// Years the engine serves, oldest first. An inverted range is empty.
    pub fn years(&self) -> Vec<i32> {
        (self.start_year..=self.end_year).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_years_cover_the_range_inclusive() {
        let config = Config {
            port: 8001,
            data_source: String::from("data"),
            metadata_file: String::from("2012~2023.csv"),
            start_year: 2012,
            end_year: 2015,
        };
        assert_eq!(config.years(), vec![2012, 2013, 2014, 2015]);
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let config = Config {
            port: 8001,
            data_source: String::from("data"),
            metadata_file: String::from("meta.csv"),
            start_year: 2020,
            end_year: 2019,
        };
        assert!(config.years().is_empty());
    }
}
