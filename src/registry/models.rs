/// Genre tag assigned to every catalogued movie. Source files carry localized
/// genre codes; anything outside the known code set maps to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Genre {
    Crime,
    Horror,
    Comic,
    Ani,
    Show,
    Action,
    Fantasy,
    Adven,
    Sf,
    Roman,
    Drama,
    Etc,
    Unknown,
}

impl Genre {
    /// Display order for genre breakdowns. `Etc` is not listed because it only
    /// exists as a fold target for below-threshold buckets.
    pub const CANONICAL: [Genre; 12] = [
        Genre::Crime,
        Genre::Horror,
        Genre::Comic,
        Genre::Ani,
        Genre::Show,
        Genre::Action,
        Genre::Fantasy,
        Genre::Adven,
        Genre::Sf,
        Genre::Roman,
        Genre::Drama,
        Genre::Unknown,
    ];

    /// Maps a localized genre code from the catalogue file to its tag.
    pub fn from_code(code: &str) -> Genre {
        match code.trim() {
            "범죄" => Genre::Crime,
            "공포" => Genre::Horror,
            "코미디" => Genre::Comic,
            "애니메이션" => Genre::Ani,
            "공연" => Genre::Show,
            "액션" => Genre::Action,
            "판타지" => Genre::Fantasy,
            "모험" => Genre::Adven,
            "SF" => Genre::Sf,
            "로맨스" => Genre::Roman,
            "드라마" => Genre::Drama,
            _ => Genre::Unknown,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Genre::Crime => "Crime",
            Genre::Horror => "Horror",
            Genre::Comic => "Comic",
            Genre::Ani => "Ani",
            Genre::Show => "Show",
            Genre::Action => "Action",
            Genre::Fantasy => "Fantasy",
            Genre::Adven => "Adven",
            Genre::Sf => "SF",
            Genre::Roman => "Roman",
            Genre::Drama => "Drama",
            Genre::Etc => "etc",
            Genre::Unknown => "Unknown",
        }
    }

    /// Fill color used by the charting frontend for this genre.
    pub fn color(self) -> &'static str {
        match self {
            Genre::Crime => "#C4B8AC",
            Genre::Horror => "#E17860",
            Genre::Comic => "#EAB86E",
            Genre::Ani => "#F8E699",
            Genre::Show => "#B6D288",
            Genre::Action => "#94AADB",
            Genre::Fantasy => "#D985C5",
            Genre::Adven => "#6EA9AF",
            Genre::Sf => "#706A99",
            Genre::Roman => "#E897A6",
            Genre::Drama => "#FFAE56",
            Genre::Etc | Genre::Unknown => "#aaa",
        }
    }
}

/// One row of the movie catalogue. Field values follow the catalogue's
/// lenient parse rules: numeric fields fall back to zero, text fields to
/// "Unknown", so a record is never rejected outright.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieRecord {
    pub listed_rank: u32,               // 순위
    pub name: String,                   // 영화명
    pub release_date: String,           // 개봉일
    pub revenue: f64,                   // 매출액
    pub weight: f64,                    // 가중치
    pub admissions: f64,                // 관객수
    pub screens: u32,                   // 스크린수
    pub showings: u32,                  // 상영횟수
    pub nationality: String,            // 대표국적
    pub production_nationality: String, // 제작국적
    pub distributor: String,            // 배급사
    pub genre: Genre,                   // 장르
    pub grade: f64,                     // 등급
    pub running_time: u32,              // 러닝타임
    pub awards: u32,                    // 수상횟수
    pub audience_rating: f64,           // 관람평점
    pub male_rating: f64,               // 남자 평점
    pub female_rating: f64,             // 여자 평점
}

impl Default for MovieRecord {
    fn default() -> Self {
        MovieRecord {
            listed_rank: 0,
            name: String::from("Unknown"),
            release_date: String::from("Unknown"),
            revenue: 0.0,
            weight: 0.0,
            admissions: 0.0,
            screens: 0,
            showings: 0,
            nationality: String::from("Unknown"),
            production_nationality: String::from("Unknown"),
            distributor: String::from("Unknown"),
            genre: Genre::Unknown,
            grade: 0.0,
            running_time: 0,
            awards: 0,
            audience_rating: 0.0,
            male_rating: 0.0,
            female_rating: 0.0,
        }
    }
}
