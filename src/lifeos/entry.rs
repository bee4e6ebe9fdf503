use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::OnceLock;

/// Sort fallback for entries without a parseable date. Undated entries group
/// before any real calendar date; the date itself is never persisted.
pub const SENTINEL_DATE: NaiveDate = NaiveDate::MIN;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnergyStability {
    High,
    Med,
    Low,
}

impl EnergyStability {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "High" => Some(Self::High),
            "Med" => Some(Self::Med),
            "Low" => Some(Self::Low),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BaselineSafety {
    Stable,
    Warning,
    Intervene,
}

impl BaselineSafety {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Stable" => Some(Self::Stable),
            "Warning" => Some(Self::Warning),
            "Intervene" => Some(Self::Intervene),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Med,
    Low,
}

impl Priority {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "High" => Some(Self::High),
            "Med" => Some(Self::Med),
            "Low" => Some(Self::Low),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProjectData {
    pub candidates: Vec<String>,
    pub signals: String,
    pub blind_spots: String,
    pub open_nodes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LifeData {
    pub energy_stability: Option<EnergyStability>,
    pub relationship_presence: Option<bool>,
    pub baseline_safety: Option<BaselineSafety>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionItem {
    pub task: String,
    pub priority: Priority,
    pub context: String,
}

impl Default for ActionItem {
    fn default() -> Self {
        Self {
            task: String::new(),
            priority: Priority::Med,
            context: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Analysis {
    pub mood: Option<f64>,
    pub focus: Option<f64>,
    pub energy: Option<f64>,
    pub tags: Vec<String>,
    pub summary: Option<String>,
    pub project_data: ProjectData,
    pub life_data: LifeData,
    pub action_items: Vec<ActionItem>,
}

/// One journal submission after normalization. Immutable once merged into the
/// archive; a re-submitted correction supersedes it wholesale instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Entry {
    pub id: Option<String>,
    pub date: Option<NaiveDate>,
    pub content: String,
    pub mood: Option<f64>,
    pub tags: Vec<String>,
    pub analysis: Option<Analysis>,
    pub embedding: Option<Vec<f32>>,
}

impl Entry {
    pub fn sort_date(&self) -> NaiveDate {
        self.date.unwrap_or(SENTINEL_DATE)
    }

    pub fn has_id(&self) -> bool {
        self.id.as_deref().is_some_and(|v| !v.trim().is_empty())
    }

    /// Date rendered for humans; undated entries show as `Unknown`.
    pub fn display_date(&self) -> String {
        match self.date {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => "Unknown".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NormalizedRecord {
    pub entry: Entry,
    /// Set when a present field had the wrong shape and was defaulted. The
    /// record is still usable; callers count and log degradations.
    pub degraded: bool,
}

fn empty_object() -> &'static Map<String, Value> {
    static EMPTY: OnceLock<Map<String, Value>> = OnceLock::new();
    EMPTY.get_or_init(Map::new)
}

/// Safe mapping access: the object view of `value` when it is a proper JSON
/// object, otherwise an empty mapping. Upstream producers are untrusted and
/// may emit scalars or null where a mapping is expected.
pub fn safe_object(value: Option<&Value>) -> &Map<String, Value> {
    value.and_then(Value::as_object).unwrap_or_else(|| empty_object())
}

fn string_field(map: &Map<String, Value>, key: &str) -> String {
    match map.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn opt_string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    let raw = string_field(map, key);
    if raw.trim().is_empty() { None } else { Some(raw) }
}

fn number_field(map: &Map<String, Value>, key: &str) -> Option<f64> {
    map.get(key).and_then(Value::as_f64)
}

fn string_list(value: Option<&Value>, degraded: &mut bool) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        Some(_) => {
            *degraded = true;
            Vec::new()
        }
    }
}

fn parse_date_value(value: &Value) -> Option<NaiveDate> {
    let raw = value.as_str()?;
    // Timestamps arrive as `YYYY-MM-DD` or with a time suffix; the leading
    // ten characters are the calendar date either way.
    let head: String = raw.trim().chars().take(10).collect();
    NaiveDate::parse_from_str(&head, "%Y-%m-%d").ok()
}

fn normalize_action_items(value: Option<&Value>, degraded: &mut bool) -> Vec<ActionItem> {
    let items = match value {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Array(items)) => items,
        Some(_) => {
            *degraded = true;
            return Vec::new();
        }
    };

    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match item {
            // Older extractor revisions emitted bare task strings.
            Value::String(task) => out.push(ActionItem {
                task: task.clone(),
                ..ActionItem::default()
            }),
            Value::Object(map) => out.push(ActionItem {
                task: opt_string_field(map, "task").unwrap_or_else(|| "Untitled Task".to_string()),
                priority: map
                    .get("priority")
                    .and_then(Value::as_str)
                    .and_then(Priority::parse)
                    .unwrap_or(Priority::Med),
                context: string_field(map, "context"),
            }),
            _ => *degraded = true,
        }
    }
    out
}

fn normalize_analysis(value: Option<&Value>, degraded: &mut bool) -> Option<Analysis> {
    let map = match value {
        None | Some(Value::Null) => return None,
        Some(Value::Object(map)) => map,
        // A scalar placeholder where a mapping was expected; treat the whole
        // annotation as absent so it contributes no signals downstream.
        Some(_) => {
            *degraded = true;
            return None;
        }
    };

    let project = map.get("project_data");
    if project.is_some_and(|v| !v.is_object() && !v.is_null()) {
        *degraded = true;
    }
    let project = safe_object(project);

    let life = map.get("life_data");
    if life.is_some_and(|v| !v.is_object() && !v.is_null()) {
        *degraded = true;
    }
    let life = safe_object(life);

    Some(Analysis {
        mood: number_field(map, "mood"),
        focus: number_field(map, "focus"),
        energy: number_field(map, "energy"),
        tags: string_list(map.get("tags"), degraded),
        summary: opt_string_field(map, "summary"),
        project_data: ProjectData {
            candidates: string_list(project.get("candidates"), degraded),
            signals: string_field(project, "signals"),
            blind_spots: string_field(project, "blind_spots"),
            open_nodes: string_field(project, "open_nodes"),
        },
        life_data: LifeData {
            energy_stability: life
                .get("energy_stability")
                .and_then(Value::as_str)
                .and_then(EnergyStability::parse),
            relationship_presence: life.get("relationship_presence").and_then(Value::as_bool),
            baseline_safety: life
                .get("baseline_safety")
                .and_then(Value::as_str)
                .and_then(BaselineSafety::parse),
        },
        action_items: normalize_action_items(map.get("action_items"), degraded),
    })
}

fn embedding_vector(value: Option<&Value>, degraded: &mut bool) -> Option<Vec<f32>> {
    let items = match value {
        None | Some(Value::Null) => return None,
        Some(Value::Array(items)) => items,
        Some(_) => {
            *degraded = true;
            return None;
        }
    };
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match item.as_f64() {
            Some(v) => out.push(v as f32),
            None => {
                *degraded = true;
                return None;
            }
        }
    }
    Some(out)
}

/// Normalize one raw record of unknown shape into an [`Entry`] with defensive
/// defaults. Never fails for a single bad field; the wrong-shape cases set
/// `degraded` so the caller can count them.
pub fn normalize(raw: &Value) -> NormalizedRecord {
    let mut degraded = !raw.is_object();
    let root = safe_object(Some(raw));

    // Ingestion writes `uuid`; older archive rows carried `id`.
    let id = opt_string_field(root, "uuid").or_else(|| opt_string_field(root, "id"));

    let date = match root.get("date") {
        None | Some(Value::Null) => {
            degraded = true;
            None
        }
        Some(value) => {
            let parsed = parse_date_value(value);
            if parsed.is_none() {
                degraded = true;
            }
            parsed
        }
    };

    // Field compatibility across ingestion revisions: `content`, `raw_text`
    // and `note` all held the entry body at some point.
    let content = opt_string_field(root, "content")
        .or_else(|| opt_string_field(root, "raw_text"))
        .or_else(|| opt_string_field(root, "note"))
        .unwrap_or_default();

    // Sidecar records label the annotation `analysis`; archive rows `ai_analysis`.
    let analysis_value = root.get("analysis").or_else(|| root.get("ai_analysis"));
    let analysis = normalize_analysis(analysis_value, &mut degraded);

    let mood = number_field(root, "mood").or_else(|| analysis.as_ref().and_then(|a| a.mood));

    let entry = Entry {
        id,
        date,
        content,
        mood,
        tags: string_list(root.get("tags"), &mut degraded),
        analysis,
        embedding: embedding_vector(root.get("embedding"), &mut degraded),
    };

    NormalizedRecord { entry, degraded }
}
