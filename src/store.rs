use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use parquet::basic::{ConvertedType, Repetition, Type as PhysicalType};
use parquet::data_type::{BoolType, ByteArray, ByteArrayType, DoubleType, Int64Type};
use parquet::file::properties::WriterProperties;
use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::file::writer::SerializedFileWriter;
use parquet::record::RowAccessor;
use parquet::schema::types::Type;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::box_score::{BoxScoreRow, RawTeamGame, SeasonType};
use crate::cleaning::{ImputationOverrides, parse_game_date};
use crate::fields::{Counting, CountingSource};
use crate::odds_api::OddsRow;
use crate::pairing::TeamGameStats;
use crate::stats::formulas::BoxLine;
use crate::teams::Team;

pub const ALL_SEASONS: &str = "ALL";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    External,
    Internal,
}

impl Origin {
    pub fn dir_name(self) -> &'static str {
        match self {
            Origin::External => "external",
            Origin::Internal => "internal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Raw,
    Interim,
    Processed,
    Inputation,
}

impl Stage {
    pub fn dir_name(self) -> &'static str {
        match self {
            Stage::Raw => "raw",
            Stage::Interim => "interim",
            Stage::Processed => "processed",
            Stage::Inputation => "inputation",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Int64(Vec<i64>),
    Double(Vec<f64>),
    Utf8(Vec<String>),
    Bool(Vec<bool>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Int64(v) => v.len(),
            Column::Double(v) => v.len(),
            Column::Utf8(v) => v.len(),
            Column::Bool(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn physical_type(&self) -> PhysicalType {
        match self {
            Column::Int64(_) => PhysicalType::INT64,
            Column::Double(_) => PhysicalType::DOUBLE,
            Column::Utf8(_) => PhysicalType::BYTE_ARRAY,
            Column::Bool(_) => PhysicalType::BOOLEAN,
        }
    }
}

/// Named, typed, equal-length columns in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<(String, Column)>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, column: Column) -> Result<()> {
        let name = name.into();
        if let Some((first, existing)) = self.columns.first()
            && existing.len() != column.len()
        {
            return Err(anyhow!(
                "column {name} has {} rows but {first} has {}",
                column.len(),
                existing.len()
            ));
        }
        if self.columns.iter().any(|(n, _)| *n == name) {
            return Err(anyhow!("duplicate column {name}"));
        }
        self.columns.push((name, column));
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.columns.first().map(|(_, c)| c.len()).unwrap_or(0)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    pub fn doubles(&self, name: &str) -> Result<&[f64]> {
        match self.column(name) {
            Some(Column::Double(v)) => Ok(v),
            Some(_) => Err(anyhow!("column {name} is not DOUBLE")),
            None => Err(anyhow!("missing column {name}")),
        }
    }

    pub fn longs(&self, name: &str) -> Result<&[i64]> {
        match self.column(name) {
            Some(Column::Int64(v)) => Ok(v),
            Some(_) => Err(anyhow!("column {name} is not INT64")),
            None => Err(anyhow!("missing column {name}")),
        }
    }

    pub fn strings(&self, name: &str) -> Result<&[String]> {
        match self.column(name) {
            Some(Column::Utf8(v)) => Ok(v),
            Some(_) => Err(anyhow!("column {name} is not UTF8")),
            None => Err(anyhow!("missing column {name}")),
        }
    }

    pub fn bools(&self, name: &str) -> Result<&[bool]> {
        match self.column(name) {
            Some(Column::Bool(v)) => Ok(v),
            Some(_) => Err(anyhow!("column {name} is not BOOLEAN")),
            None => Err(anyhow!("missing column {name}")),
        }
    }

    fn schema(&self) -> Result<Arc<Type>> {
        let mut fields = Vec::with_capacity(self.columns.len());
        for (name, column) in &self.columns {
            let mut builder = Type::primitive_type_builder(name, column.physical_type())
                .with_repetition(Repetition::REQUIRED);
            if matches!(column, Column::Utf8(_)) {
                builder = builder.with_converted_type(ConvertedType::UTF8);
            }
            fields.push(Arc::new(builder.build().with_context(|| format!("schema for {name}"))?));
        }
        let schema = Type::group_type_builder("schema")
            .with_fields(fields)
            .build()
            .context("build parquet schema")?;
        Ok(Arc::new(schema))
    }
}

/// Writes `table` to `path` through a temporary sibling file.
pub fn write_parquet(path: &Path, table: &Table) -> Result<()> {
    if table.columns.is_empty() {
        return Err(anyhow!("refusing to write table without columns to {}", path.display()));
    }
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let tmp = path.with_extension("parquet.tmp");
    let file = fs::File::create(&tmp).with_context(|| format!("create {}", tmp.display()))?;
    let props = Arc::new(WriterProperties::builder().build());
    let mut writer =
        SerializedFileWriter::new(file, table.schema()?, props).context("open parquet writer")?;

    let mut row_group = writer.next_row_group().context("start row group")?;
    let mut idx = 0;
    while let Some(mut col) = row_group.next_column().context("next column")? {
        let Some((name, column)) = table.columns.get(idx) else {
            return Err(anyhow!("schema/table column count mismatch"));
        };
        let written = match column {
            Column::Double(values) => {
                col.typed::<DoubleType>().write_batch(values, None, None)
            }
            Column::Int64(values) => col.typed::<Int64Type>().write_batch(values, None, None),
            Column::Bool(values) => col.typed::<BoolType>().write_batch(values, None, None),
            Column::Utf8(values) => {
                let bytes = values
                    .iter()
                    .map(|s| ByteArray::from(s.as_str()))
                    .collect::<Vec<_>>();
                col.typed::<ByteArrayType>().write_batch(&bytes, None, None)
            }
        };
        written.with_context(|| format!("write column {name}"))?;
        col.close().with_context(|| format!("close column {name}"))?;
        idx += 1;
    }
    row_group.close().context("close row group")?;
    writer.close().context("close parquet writer")?;

    fs::rename(&tmp, path).with_context(|| format!("swap {}", path.display()))?;
    debug!(path = %path.display(), rows = table.rows(), "wrote parquet");
    Ok(())
}

/// Reads a file written by [`write_parquet`]. A missing file is `Ok(None)`.
pub fn read_parquet(path: &Path) -> Result<Option<Table>> {
    if !path.exists() {
        return Ok(None);
    }
    let file = fs::File::open(path).with_context(|| format!("open {}", path.display()))?;
    let reader = SerializedFileReader::new(file).context("open parquet reader")?;
    let specs = reader
        .metadata()
        .file_metadata()
        .schema_descr()
        .columns()
        .iter()
        .map(|c| (c.name().to_string(), c.physical_type()))
        .collect::<Vec<_>>();

    let mut columns = specs
        .iter()
        .map(|(name, physical)| {
            let column = match physical {
                PhysicalType::DOUBLE => Column::Double(Vec::new()),
                PhysicalType::INT64 => Column::Int64(Vec::new()),
                PhysicalType::BOOLEAN => Column::Bool(Vec::new()),
                PhysicalType::BYTE_ARRAY => Column::Utf8(Vec::new()),
                other => return Err(anyhow!("unsupported physical type {other:?} for {name}")),
            };
            Ok((name.clone(), column))
        })
        .collect::<Result<Vec<_>>>()?;

    let iter = reader.get_row_iter(None).context("iterate parquet rows")?;
    for row in iter {
        let row = row.context("decode parquet row")?;
        for (idx, (name, column)) in columns.iter_mut().enumerate() {
            match column {
                Column::Double(v) => v.push(row.get_double(idx).with_context(|| name.clone())?),
                Column::Int64(v) => v.push(row.get_long(idx).with_context(|| name.clone())?),
                Column::Bool(v) => v.push(row.get_bool(idx).with_context(|| name.clone())?),
                Column::Utf8(v) => {
                    v.push(row.get_string(idx).with_context(|| name.clone())?.clone())
                }
            }
        }
    }
    Ok(Some(Table { columns }))
}

fn opt_to_nan(value: Option<f64>) -> f64 {
    value.unwrap_or(f64::NAN)
}

fn nan_to_opt(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

pub fn box_scores_to_table(rows: &[BoxScoreRow]) -> Result<Table> {
    let strings = |f: fn(&BoxScoreRow) -> String| Column::Utf8(rows.iter().map(f).collect());
    let mut table = Table::new();
    table.push("SEASON_ID", strings(|r| r.season_id.clone()))?;
    table.push("TEAM_ID", Column::Int64(rows.iter().map(|r| r.team_id).collect()))?;
    table.push("TEAM_ABBREVIATION", strings(|r| r.team_abbreviation.clone()))?;
    table.push("TEAM_NAME", strings(|r| r.team_name.clone()))?;
    table.push("GAME_ID", strings(|r| r.game_id.clone()))?;
    table.push("GAME_DATE", strings(|r| r.game_date.format("%Y-%m-%d").to_string()))?;
    table.push("MATCHUP", strings(|r| r.matchup.clone()))?;
    table.push("OPP_ABBREVIATION", strings(|r| r.opponent_abbreviation.clone()))?;
    table.push("HOME", Column::Bool(rows.iter().map(|r| r.home).collect()))?;
    table.push("WIN", Column::Bool(rows.iter().map(|r| r.win).collect()))?;
    table.push(
        "REST_DAYS",
        Column::Double(rows.iter().map(|r| opt_to_nan(r.rest_days.map(|d| d as f64))).collect()),
    )?;
    for stat in Counting::ALL {
        table.push(
            stat.column(),
            Column::Double(rows.iter().map(|r| r.line.counting(stat)).collect()),
        )?;
    }
    Ok(table)
}

pub fn table_to_box_scores(table: &Table) -> Result<Vec<BoxScoreRow>> {
    let season_ids = table.strings("SEASON_ID")?;
    let team_ids = table.longs("TEAM_ID")?;
    let abbreviations = table.strings("TEAM_ABBREVIATION")?;
    let names = table.strings("TEAM_NAME")?;
    let game_ids = table.strings("GAME_ID")?;
    let dates = table.strings("GAME_DATE")?;
    let matchups = table.strings("MATCHUP")?;
    let opponents = table.strings("OPP_ABBREVIATION")?;
    let home = table.bools("HOME")?;
    let win = table.bools("WIN")?;
    let rest = table.doubles("REST_DAYS")?;
    let counts = Counting::ALL
        .iter()
        .map(|stat| table.doubles(stat.column()).map(|v| (*stat, v)))
        .collect::<Result<Vec<_>>>()?;

    let mut out = Vec::with_capacity(table.rows());
    for i in 0..table.rows() {
        let mut line = BoxLine::default();
        for (stat, values) in &counts {
            line.set(*stat, values[i]);
        }
        out.push(BoxScoreRow {
            season_id: season_ids[i].clone(),
            team_id: team_ids[i],
            team_abbreviation: abbreviations[i].clone(),
            team_name: names[i].clone(),
            game_id: game_ids[i].clone(),
            game_date: parse_game_date(&dates[i])?,
            matchup: matchups[i].clone(),
            opponent_abbreviation: opponents[i].clone(),
            home: home[i],
            win: win[i],
            rest_days: nan_to_opt(rest[i]).map(|d| d as i64),
            line,
        });
    }
    Ok(out)
}

/// Raw provider rows; empty cells are stored as NaN and the API's `MIN`
/// column name is kept.
pub fn raw_games_to_table(rows: &[RawTeamGame]) -> Result<Table> {
    let strings = |f: fn(&RawTeamGame) -> String| Column::Utf8(rows.iter().map(f).collect());
    let mut table = Table::new();
    table.push("SEASON_ID", strings(|r| r.season_id.clone()))?;
    table.push("TEAM_ID", Column::Int64(rows.iter().map(|r| r.team_id).collect()))?;
    table.push("TEAM_ABBREVIATION", strings(|r| r.team_abbreviation.clone()))?;
    table.push("TEAM_NAME", strings(|r| r.team_name.clone()))?;
    table.push("GAME_ID", strings(|r| r.game_id.clone()))?;
    table.push("GAME_DATE", strings(|r| r.game_date.clone()))?;
    table.push("MATCHUP", strings(|r| r.matchup.clone()))?;
    table.push("WL", strings(|r| r.wl.clone().unwrap_or_default()))?;
    for stat in Counting::ALL {
        let name = match stat {
            Counting::Mp => "MIN",
            other => other.column(),
        };
        table.push(
            name,
            Column::Double(rows.iter().map(|r| opt_to_nan(r.count(stat))).collect()),
        )?;
    }
    table.push(
        "PLUS_MINUS",
        Column::Double(rows.iter().map(|r| opt_to_nan(r.plus_minus)).collect()),
    )?;
    Ok(table)
}

pub fn team_game_stats_to_table(stats: &TeamGameStats) -> Result<Table> {
    let keys = &stats.keys;
    let mut table = Table::new();
    table.push("SEASON_ID", Column::Utf8(keys.iter().map(|k| k.season_id.clone()).collect()))?;
    table.push("GAME_ID", Column::Utf8(keys.iter().map(|k| k.game_id.clone()).collect()))?;
    table.push(
        "GAME_DATE",
        Column::Utf8(keys.iter().map(|k| k.game_date.format("%Y-%m-%d").to_string()).collect()),
    )?;
    table.push("TEAM_ID", Column::Int64(keys.iter().map(|k| k.team_id).collect()))?;
    table.push("OPP_TEAM_ID", Column::Int64(keys.iter().map(|k| k.opponent_id).collect()))?;
    table.push("HOME", Column::Bool(keys.iter().map(|k| k.home).collect()))?;
    table.push("WIN", Column::Bool(keys.iter().map(|k| k.win).collect()))?;
    for (name, values) in stats.stats.iter() {
        table.push(name, Column::Double(values.to_vec()))?;
    }
    Ok(table)
}

pub fn odds_to_table(rows: &[OddsRow]) -> Result<Table> {
    let strings = |f: fn(&OddsRow) -> String| Column::Utf8(rows.iter().map(f).collect());
    let mut table = Table::new();
    table.push("EVENT_ID", strings(|r| r.event_id.clone()))?;
    table.push("COMMENCE_TIME", strings(|r| r.commence_time.clone()))?;
    table.push("HOME_TEAM", strings(|r| r.home_team.clone()))?;
    table.push("AWAY_TEAM", strings(|r| r.away_team.clone()))?;
    table.push("BOOKMAKER", strings(|r| r.bookmaker.clone()))?;
    table.push("LAST_UPDATE", strings(|r| r.last_update.clone().unwrap_or_default()))?;
    table.push("MARKET", strings(|r| r.market.clone()))?;
    table.push("OUTCOME", strings(|r| r.outcome.clone()))?;
    table.push("PRICE", Column::Double(rows.iter().map(|r| r.price).collect()))?;
    table.push("POINT", Column::Double(rows.iter().map(|r| opt_to_nan(r.point)).collect()))?;
    table.push(
        "IMPLIED_PROBABILITY",
        Column::Double(rows.iter().map(|r| opt_to_nan(r.implied_probability)).collect()),
    )?;
    Ok(table)
}

const TEAM_METADATA: &str = "team_metadata";
const TEAM_ID_MAP: &str = "team_id_map";
const TEAM_ABBREVIATION_MAP: &str = "team_abbreviation_map";
const IMPUTATION_MAP: &str = "imputation_map";

/// Flat-file layout rooted at one data directory.
#[derive(Debug, Clone)]
pub struct DataStore {
    root: PathBuf,
}

impl DataStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn stage_dir(&self, origin: Origin, stage: Stage) -> PathBuf {
        self.root.join(origin.dir_name()).join(stage.dir_name())
    }

    fn team_games_dir(&self, origin: Origin, stage: Stage, season_type: SeasonType) -> PathBuf {
        self.stage_dir(origin, stage)
            .join("teams")
            .join("games")
            .join(season_type.dir_name())
    }

    /// `{root}/{origin}/{stage}/teams/games/{SeasonType}/{season|ALL}/{team_id}.parquet`
    pub fn team_games_path(
        &self,
        origin: Origin,
        stage: Stage,
        season_type: SeasonType,
        season: Option<&str>,
        team_id: i64,
    ) -> PathBuf {
        self.team_games_dir(origin, stage, season_type)
            .join(season.unwrap_or(ALL_SEASONS))
            .join(format!("{team_id}.parquet"))
    }

    pub fn save_team_games(
        &self,
        origin: Origin,
        stage: Stage,
        season_type: SeasonType,
        season: Option<&str>,
        team_id: i64,
        rows: &[BoxScoreRow],
    ) -> Result<PathBuf> {
        let path = self.team_games_path(origin, stage, season_type, season, team_id);
        write_parquet(&path, &box_scores_to_table(rows)?)?;
        Ok(path)
    }

    pub fn load_team_games(
        &self,
        origin: Origin,
        stage: Stage,
        season_type: SeasonType,
        season: Option<&str>,
        team_id: i64,
    ) -> Result<Option<Vec<BoxScoreRow>>> {
        let path = self.team_games_path(origin, stage, season_type, season, team_id);
        read_parquet(&path)?
            .map(|table| table_to_box_scores(&table))
            .transpose()
            .with_context(|| format!("decode {}", path.display()))
    }

    pub fn save_raw_team_games(
        &self,
        season_type: SeasonType,
        season: Option<&str>,
        team_id: i64,
        rows: &[RawTeamGame],
    ) -> Result<PathBuf> {
        let path = self.team_games_path(Origin::External, Stage::Raw, season_type, season, team_id);
        write_parquet(&path, &raw_games_to_table(rows)?)?;
        Ok(path)
    }

    /// Season directories present for a stage, sorted.
    pub fn list_seasons(
        &self,
        origin: Origin,
        stage: Stage,
        season_type: SeasonType,
    ) -> Result<Vec<String>> {
        let dir = self.team_games_dir(origin, stage, season_type);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut out = fs::read_dir(&dir)
            .with_context(|| format!("list {}", dir.display()))?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .filter(|name| name != ALL_SEASONS)
            .collect::<Vec<_>>();
        out.sort();
        Ok(out)
    }

    /// Team ids with a stored file for the given stage and season directory.
    pub fn stored_team_ids(
        &self,
        origin: Origin,
        stage: Stage,
        season_type: SeasonType,
        season: Option<&str>,
    ) -> Result<Vec<i64>> {
        let dir = self
            .team_games_dir(origin, stage, season_type)
            .join(season.unwrap_or(ALL_SEASONS));
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut out = fs::read_dir(&dir)
            .with_context(|| format!("list {}", dir.display()))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "parquet"))
            .filter_map(|path| path.file_stem()?.to_str()?.parse::<i64>().ok())
            .collect::<Vec<_>>();
        out.sort_unstable();
        Ok(out)
    }

    pub fn team_game_stats_path(&self, season_type: SeasonType) -> PathBuf {
        self.stage_dir(Origin::Internal, Stage::Processed)
            .join("teams")
            .join("games")
            .join(season_type.dir_name())
            .join("team_game_stats.parquet")
    }

    pub fn save_team_game_stats(
        &self,
        season_type: SeasonType,
        stats: &TeamGameStats,
    ) -> Result<PathBuf> {
        let path = self.team_game_stats_path(season_type);
        write_parquet(&path, &team_game_stats_to_table(stats)?)?;
        Ok(path)
    }

    pub fn unresolved_path(&self, season_type: SeasonType, team_id: i64) -> PathBuf {
        self.stage_dir(Origin::Internal, Stage::Inputation)
            .join("teams")
            .join("games")
            .join(season_type.dir_name())
            .join(format!("unresolved_{team_id}.json"))
    }

    pub fn odds_path(&self, date: &str) -> PathBuf {
        let safe = date.replace(':', "-");
        self.stage_dir(Origin::External, Stage::Raw)
            .join("odds")
            .join(format!("{safe}.parquet"))
    }

    pub fn save_odds(&self, date: &str, rows: &[OddsRow]) -> Result<PathBuf> {
        let path = self.odds_path(date);
        write_parquet(&path, &odds_to_table(rows)?)?;
        Ok(path)
    }

    fn json_path(&self, origin: Origin, stage: Stage, subdir: &str, name: &str) -> PathBuf {
        self.stage_dir(origin, stage)
            .join(subdir)
            .join(format!("{name}.json"))
    }

    pub fn save_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
        }
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(value).context("serialize sidecar")?;
        fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
        fs::rename(&tmp, path).with_context(|| format!("swap {}", path.display()))?;
        Ok(())
    }

    /// A missing file means "not cached yet" and loads as `None`.
    pub fn load_json<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
        Ok(Some(value))
    }

    pub fn team_metadata_path(&self) -> PathBuf {
        self.json_path(Origin::External, Stage::Raw, "teams", TEAM_METADATA)
    }

    pub fn save_team_metadata(&self, teams: &[Team]) -> Result<()> {
        self.save_json(&self.team_metadata_path(), &teams)
    }

    pub fn load_team_metadata(&self) -> Result<Option<Vec<Team>>> {
        self.load_json(&self.team_metadata_path())
    }

    pub fn save_team_id_map(&self, map: &std::collections::BTreeMap<String, i64>) -> Result<()> {
        let path = self.json_path(Origin::External, Stage::Interim, "teams", TEAM_ID_MAP);
        self.save_json(&path, map)
    }

    pub fn load_team_id_map(&self) -> Result<Option<std::collections::BTreeMap<String, i64>>> {
        let path = self.json_path(Origin::External, Stage::Interim, "teams", TEAM_ID_MAP);
        self.load_json(&path)
    }

    pub fn save_team_abbreviation_map(
        &self,
        map: &std::collections::BTreeMap<i64, String>,
    ) -> Result<()> {
        let path = self.json_path(Origin::External, Stage::Interim, "teams", TEAM_ABBREVIATION_MAP);
        self.save_json(&path, map)
    }

    pub fn load_team_abbreviation_map(
        &self,
    ) -> Result<Option<std::collections::BTreeMap<i64, String>>> {
        let path = self.json_path(Origin::External, Stage::Interim, "teams", TEAM_ABBREVIATION_MAP);
        self.load_json(&path)
    }

    pub fn imputation_path(&self) -> PathBuf {
        self.json_path(Origin::Internal, Stage::Inputation, "teams/games", IMPUTATION_MAP)
    }

    pub fn load_imputation_overrides(&self) -> Result<Option<ImputationOverrides>> {
        self.load_json(&self.imputation_path())
    }

    pub fn save_imputation_overrides(&self, overrides: &ImputationOverrides) -> Result<()> {
        self.save_json(&self.imputation_path(), overrides)
    }
}
