use csv::ReaderBuilder;
use std::collections::HashMap;
use tracing::info;

use super::{without_bom, DataSource, LoadError};
use crate::registry::models::{Genre, MovieRecord};
use crate::registry::MovieRegistry;

/// Fetches the movie catalogue file and builds the registry from it.
pub async fn fetch_movie_registry(
    source: &DataSource,
    file: &str,
) -> Result<MovieRegistry, LoadError> {
    let bytes = source.fetch(file).await?;
    let records = parse_metadata_csv(&bytes)?;
    info!(movies = records.len(), "movie catalogue loaded");
    Ok(MovieRegistry::from_records(records))
}

/// Parses catalogue rows from the localized column layout.
///
/// Header names match exactly after trimming; a missing column leaves its
/// field at the default, and no row is ever rejected: numbers parse-or-zero
/// and text falls back to "Unknown".
pub fn parse_metadata_csv(bytes: &[u8]) -> Result<Vec<MovieRecord>, LoadError> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(without_bom(bytes));

    let columns: HashMap<String, usize> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(index, name)| (name.trim().to_string(), index))
        .collect();

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        records.push(MovieRecord {
            listed_rank: parse_count(field(&columns, &record, "순위")),
            name: text_or_unknown(field(&columns, &record, "영화명")),
            release_date: text_or_unknown(field(&columns, &record, "개봉일")),
            revenue: parse_numeric(field(&columns, &record, "매출액")),
            weight: parse_numeric(field(&columns, &record, "가중치")),
            admissions: parse_numeric(field(&columns, &record, "관객수")),
            screens: parse_count(field(&columns, &record, "스크린수")),
            showings: parse_count(field(&columns, &record, "상영횟수")),
            nationality: text_or_unknown(field(&columns, &record, "대표국적")),
            production_nationality: text_or_unknown(field(&columns, &record, "제작국적")),
            distributor: text_or_unknown(field(&columns, &record, "배급사")),
            genre: Genre::from_code(field(&columns, &record, "장르")),
            grade: parse_numeric(field(&columns, &record, "등급")),
            running_time: parse_count(field(&columns, &record, "러닝타임")),
            awards: parse_count(field(&columns, &record, "수상횟수")),
            audience_rating: parse_numeric(field(&columns, &record, "관람평점")),
            male_rating: parse_numeric(field(&columns, &record, "남자 평점")),
            female_rating: parse_numeric(field(&columns, &record, "여자 평점")),
        });
    }
    Ok(records)
}

fn field<'a>(
    columns: &HashMap<String, usize>,
    record: &'a csv::StringRecord,
    name: &str,
) -> &'a str {
    columns
        .get(name)
        .and_then(|&index| record.get(index))
        .map(str::trim)
        .unwrap_or("")
}

/// Large numeric columns carry thousands separators; anything that still
/// fails to parse counts as zero.
fn parse_numeric(field: &str) -> f64 {
    field
        .replace(',', "")
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

fn parse_count(field: &str) -> u32 {
    let value = parse_numeric(field);
    if value > 0.0 {
        value as u32
    } else {
        0
    }
}

fn text_or_unknown(field: &str) -> String {
    if field.is_empty() {
        String::from("Unknown")
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "순위,영화명,개봉일,매출액,가중치,관객수,스크린수,상영횟수,대표국적,제작국적,배급사,장르,등급,러닝타임,수상횟수,관람평점,남자 평점,여자 평점";

    #[test]
    fn test_parse_full_row() {
        let csv = format!(
            "{}\n1,명량,2014-07-30,\"135,748,398,910\",95,\"17,613,682\",1587,188611,한국,한국,CJ,드라마,15,128,2,8.88,8.9,8.86\n",
            HEADER
        );
        let records = parse_metadata_csv(csv.as_bytes()).unwrap();

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.listed_rank, 1);
        assert_eq!(record.name, "명량");
        assert_eq!(record.release_date, "2014-07-30");
        assert_eq!(record.revenue, 135_748_398_910.0);
        assert_eq!(record.weight, 95.0);
        assert_eq!(record.admissions, 17_613_682.0);
        assert_eq!(record.screens, 1587);
        assert_eq!(record.showings, 188_611);
        assert_eq!(record.nationality, "한국");
        assert_eq!(record.distributor, "CJ");
        assert_eq!(record.genre, Genre::Drama);
        assert_eq!(record.grade, 15.0);
        assert_eq!(record.running_time, 128);
        assert_eq!(record.awards, 2);
        assert_eq!(record.audience_rating, 8.88);
        assert_eq!(record.male_rating, 8.9);
        assert_eq!(record.female_rating, 8.86);
    }

    #[test]
    fn test_blank_and_garbage_fields_fall_back() {
        let csv = format!(
            "{}\nabc,,n/a,?,,,-2,x,,,,스릴러,,,-1,bad,,\n",
            HEADER
        );
        let records = parse_metadata_csv(csv.as_bytes()).unwrap();

        let record = &records[0];
        assert_eq!(record.listed_rank, 0);
        assert_eq!(record.name, "Unknown");
        assert_eq!(record.release_date, "n/a");
        assert_eq!(record.revenue, 0.0);
        assert_eq!(record.screens, 0);
        assert_eq!(record.showings, 0);
        assert_eq!(record.nationality, "Unknown");
        assert_eq!(record.distributor, "Unknown");
        assert_eq!(record.genre, Genre::Unknown);
        assert_eq!(record.awards, 0);
        assert_eq!(record.audience_rating, 0.0);
    }

    #[test]
    fn test_missing_columns_leave_defaults() {
        let csv = "영화명,관람평점\n부산행,7.7\n";
        let records = parse_metadata_csv(csv.as_bytes()).unwrap();

        let record = &records[0];
        assert_eq!(record.name, "부산행");
        assert_eq!(record.audience_rating, 7.7);
        assert_eq!(record.genre, Genre::Unknown);
        assert_eq!(record.revenue, 0.0);
        assert_eq!(record.distributor, "Unknown");
    }

    #[test]
    fn test_bom_on_first_header() {
        let mut csv = Vec::new();
        csv.extend_from_slice(b"\xEF\xBB\xBF");
        csv.extend_from_slice("순위,영화명\n3,괴물\n".as_bytes());
        let records = parse_metadata_csv(&csv).unwrap();

        assert_eq!(records[0].listed_rank, 3);
        assert_eq!(records[0].name, "괴물");
    }

    #[test]
    fn test_non_finite_numeric_reads_as_zero() {
        let csv = "영화명,관람평점,수상횟수\n괴물,inf,NaN\n";
        let records = parse_metadata_csv(csv.as_bytes()).unwrap();

        assert_eq!(records[0].audience_rating, 0.0);
        assert_eq!(records[0].awards, 0);
    }
}
