use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: i64,
    pub abbreviation: String,
    pub nickname: String,
    pub city: String,
    pub full_name: String,
    pub state: String,
    pub year_founded: i32,
}

// (id, abbreviation, nickname, city, state, founded)
const FRANCHISES: [(i64, &str, &str, &str, &str, i32); 30] = [
    (1610612737, "ATL", "Hawks", "Atlanta", "Georgia", 1949),
    (1610612738, "BOS", "Celtics", "Boston", "Massachusetts", 1946),
    (1610612739, "CLE", "Cavaliers", "Cleveland", "Ohio", 1970),
    (1610612740, "NOP", "Pelicans", "New Orleans", "Louisiana", 2002),
    (1610612741, "CHI", "Bulls", "Chicago", "Illinois", 1966),
    (1610612742, "DAL", "Mavericks", "Dallas", "Texas", 1980),
    (1610612743, "DEN", "Nuggets", "Denver", "Colorado", 1976),
    (1610612744, "GSW", "Warriors", "Golden State", "California", 1946),
    (1610612745, "HOU", "Rockets", "Houston", "Texas", 1967),
    (1610612746, "LAC", "Clippers", "Los Angeles", "California", 1970),
    (1610612747, "LAL", "Lakers", "Los Angeles", "California", 1948),
    (1610612748, "MIA", "Heat", "Miami", "Florida", 1988),
    (1610612749, "MIL", "Bucks", "Milwaukee", "Wisconsin", 1968),
    (1610612750, "MIN", "Timberwolves", "Minnesota", "Minnesota", 1989),
    (1610612751, "BKN", "Nets", "Brooklyn", "New York", 1976),
    (1610612752, "NYK", "Knicks", "New York", "New York", 1946),
    (1610612753, "ORL", "Magic", "Orlando", "Florida", 1989),
    (1610612754, "IND", "Pacers", "Indiana", "Indiana", 1976),
    (1610612755, "PHI", "76ers", "Philadelphia", "Pennsylvania", 1949),
    (1610612756, "PHX", "Suns", "Phoenix", "Arizona", 1968),
    (1610612757, "POR", "Trail Blazers", "Portland", "Oregon", 1970),
    (1610612758, "SAC", "Kings", "Sacramento", "California", 1948),
    (1610612759, "SAS", "Spurs", "San Antonio", "Texas", 1976),
    (1610612760, "OKC", "Thunder", "Oklahoma City", "Oklahoma", 1967),
    (1610612761, "TOR", "Raptors", "Toronto", "Ontario", 1995),
    (1610612762, "UTA", "Jazz", "Utah", "Utah", 1974),
    (1610612763, "MEM", "Grizzlies", "Memphis", "Tennessee", 1995),
    (1610612764, "WAS", "Wizards", "Washington", "District of Columbia", 1961),
    (1610612765, "DET", "Pistons", "Detroit", "Michigan", 1948),
    (1610612766, "CHA", "Hornets", "Charlotte", "North Carolina", 1988),
];

pub fn all_teams() -> Vec<Team> {
    FRANCHISES
        .iter()
        .map(|(id, abbreviation, nickname, city, state, founded)| Team {
            id: *id,
            abbreviation: abbreviation.to_string(),
            nickname: nickname.to_string(),
            city: city.to_string(),
            full_name: format!("{city} {nickname}"),
            state: state.to_string(),
            year_founded: *founded,
        })
        .collect()
}

pub fn team_ids(teams: &[Team]) -> Vec<i64> {
    teams.iter().map(|t| t.id).collect()
}

/// Nickname, city and abbreviation all point at the team id. Cities shared by
/// two franchises resolve to the later one in the list.
pub fn team_id_map(teams: &[Team]) -> BTreeMap<String, i64> {
    let mut out = BTreeMap::new();
    for team in teams {
        out.insert(team.nickname.clone(), team.id);
        out.insert(team.city.clone(), team.id);
        out.insert(team.abbreviation.clone(), team.id);
    }
    out
}

pub fn team_abbreviation_map(teams: &[Team]) -> BTreeMap<i64, String> {
    teams
        .iter()
        .map(|t| (t.id, t.abbreviation.clone()))
        .collect()
}

pub fn find_by_abbreviation<'a>(teams: &'a [Team], abbreviation: &str) -> Option<&'a Team> {
    let wanted = abbreviation.trim();
    teams
        .iter()
        .find(|t| t.abbreviation.eq_ignore_ascii_case(wanted))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thirty_unique_franchises() {
        let teams = all_teams();
        let mut ids = team_ids(&teams);
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 30);
        assert_eq!(
            find_by_abbreviation(&teams, "gsw").map(|t| t.full_name.as_str()),
            Some("Golden State Warriors")
        );
    }

    #[test]
    fn id_map_covers_names_and_abbreviations() {
        let teams = all_teams();
        let map = team_id_map(&teams);
        assert_eq!(map.get("Celtics"), Some(&1610612738));
        assert_eq!(map.get("BOS"), Some(&1610612738));
        assert_eq!(map.get("Los Angeles"), Some(&1610612747));
        let abbr = team_abbreviation_map(&teams);
        assert_eq!(abbr.get(&1610612762).map(String::as_str), Some("UTA"));
    }
}
