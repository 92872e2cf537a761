//! Session files: the track duration plus the entity feeds to review.
//!
//! ```toml
//! duration = 120.0
//!
//! [[subtitles]]
//! id = 1
//! start = 20.0
//! end = 50.0
//! label = "Where were you last night?"
//!
//! [[issues]]
//! id = 7
//! time = 31.5
//! label = "Lip-sync drift"
//! severity = "high"
//! ```

use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::Deserialize;

use crate::entity::{EntityFeed, EntityKind, Severity, TimedEntity};
use crate::error::{Error, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SessionFile {
    duration: Option<f64>,
    #[serde(default)]
    subtitles: Vec<EntityRecord>,
    #[serde(default)]
    issues: Vec<EntityRecord>,
    #[serde(default)]
    annotations: Vec<EntityRecord>,
    #[serde(default)]
    recommendations: Vec<EntityRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EntityRecord {
    id: u64,
    #[serde(default)]
    label: String,
    time: Option<f64>,
    start: Option<f64>,
    end: Option<f64>,
    severity: Option<Severity>,
    #[serde(default)]
    flagged: bool,
}

impl EntityRecord {
    fn into_entity(self, kind: EntityKind) -> Result<TimedEntity> {
        let entity = match (self.time, self.start) {
            (_, Some(start)) => {
                let end = self.end.unwrap_or(start);
                if end < start {
                    warn!("entity {} ends before it starts ({start} > {end})", self.id);
                }
                TimedEntity::interval(self.id, start, end, kind, self.label)
            }
            (Some(time), None) => TimedEntity::point(self.id, time, kind, self.label),
            (None, None) => return Err(Error::MissingTime { id: self.id }),
        };
        let entity = entity.with_flag(self.flagged);
        Ok(match self.severity {
            Some(severity) => entity.with_severity(severity),
            None => entity,
        })
    }
}

fn into_feed(records: Vec<EntityRecord>, kind: EntityKind) -> Result<EntityFeed> {
    let entities = records
        .into_iter()
        .map(|record| record.into_entity(kind))
        .collect::<Result<Vec<_>>>()?;
    Ok(EntityFeed::new(entities))
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub path: Option<PathBuf>,
    pub duration: f64,
    pub subtitles: EntityFeed,
    pub issues: EntityFeed,
    pub annotations: EntityFeed,
    pub recommendations: EntityFeed,
}

impl Session {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut session = Self::parse(&text, path)?;
        session.path = Some(path.to_path_buf());
        debug!(
            "loaded {:?}: {}s, {} subtitles, {} issues, {} annotations, {} recommendations",
            path,
            session.duration,
            session.subtitles.len(),
            session.issues.len(),
            session.annotations.len(),
            session.recommendations.len()
        );
        Ok(session)
    }

    /// Parse session text; `origin` only labels errors.
    pub fn parse(text: &str, origin: &Path) -> Result<Self> {
        let file: SessionFile = toml::from_str(text).map_err(|source| Error::Parse {
            path: origin.to_path_buf(),
            source,
        })?;

        let subtitles = into_feed(file.subtitles, EntityKind::Subtitle)?;
        let issues = into_feed(file.issues, EntityKind::Issue)?;
        let annotations = into_feed(file.annotations, EntityKind::Annotation)?;
        let recommendations = into_feed(file.recommendations, EntityKind::Recommendation)?;

        let duration = file.duration.unwrap_or_else(|| {
            [&subtitles, &issues, &annotations, &recommendations]
                .into_iter()
                .filter_map(EntityFeed::max_end)
                .fold(0.0, f64::max)
        });

        Ok(Self {
            path: None,
            duration,
            subtitles,
            issues,
            annotations,
            recommendations,
        })
    }

    /// Feeds summarised by the overview density map.
    pub fn overview_feeds(&self) -> [&EntityFeed; 2] {
        [&self.subtitles, &self.issues]
    }
}
