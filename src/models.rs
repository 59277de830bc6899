//! Domain entities synchronized from the remote course snapshots.
//!
//! Every entity carries a local primary key (`id`) and the remote source key
//! (`remote_id` or the provider's own id column name) used for idempotent
//! upsert matching. Questions additionally carry the course code, since the
//! same remote id recurs across course-specific snapshots.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Exam question. Text and explanation are stored post-decryption.
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct Question {
    pub id: i64,
    pub remote_id: i64,
    pub course: String,
    pub text: Option<String>,
    pub chapter_id: Option<i64>,
    pub smc_id: Option<i64>,
    pub source_id: Option<i64>,
    pub last_modified: Option<String>,
    pub explanation: Option<String>,
    pub old_question_id: Option<i64>,
    pub lsc_id: Option<i64>,
}

/// Multiple-choice answer. `question_id` is the remote question key.
/// `choice` is assigned once (A..H) and never recomputed; `discussion`
/// is maintained locally and untouched by sync.
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct Answer {
    pub id: i64,
    pub remote_id: i64,
    pub text: Option<String>,
    pub question_id: i64,
    pub correct: bool,
    pub choice: Option<String>,
    pub last_modified: Option<String>,
    pub discussion: Option<String>,
}

/// Figure/chart image. The binary payload may be inline, or read from
/// `file_name` under the configured image directory at serve time.
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct Image {
    pub id: i64,
    pub remote_id: i64,
    pub pic_type: Option<i64>,
    pub group_id: Option<i64>,
    pub test_id: Option<i64>,
    pub image_name: Option<String>,
    pub description: Option<String>,
    pub file_name: Option<String>,
    #[serde(skip)]
    pub bin_image: Option<Vec<u8>>,
    pub last_modified: Option<String>,
    pub figure_section_id: Option<i64>,
    pub pixels_per_nm: Option<f64>,
    pub sort_by: Option<i64>,
    pub image_library_id: Option<i64>,
}

/// Airman Certification Standards node.
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct Acs {
    pub id: i64,
    pub remote_id: i64,
    pub group_id: Option<i64>,
    pub parent_id: Option<i64>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub is_completed_code: Option<i64>,
    pub last_modified: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct BinaryData {
    pub id: i64,
    pub remote_id: i64,
    pub category: Option<i64>,
    pub group_id: Option<i64>,
    pub image_name: Option<String>,
    pub description: Option<String>,
    pub file_name: Option<String>,
    pub bin_type: Option<i64>,
    #[serde(skip)]
    pub bin_data: Option<Vec<u8>>,
    pub last_modified: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct Chapter {
    pub id: i64,
    pub chapter_id: i64,
    pub chapter_name: Option<String>,
    pub group_id: Option<i64>,
    pub sort_by: Option<i64>,
    pub last_modified: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct FigureSection {
    pub id: i64,
    pub figure_section_id: i64,
    pub figure_section: Option<String>,
    pub last_modified: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct Group {
    pub id: i64,
    pub group_id: i64,
    pub group_name: Option<String>,
    pub group_abbr: Option<String>,
    pub last_modified: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct Library {
    pub id: i64,
    pub remote_id: i64,
    pub region: Option<String>,
    pub parent_id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_section: Option<i64>,
    pub source: Option<String>,
    pub ordinal: Option<i64>,
    pub last_modified: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct SubjectMatterCode {
    pub id: i64,
    pub remote_id: i64,
    pub code: Option<String>,
    pub source_id: Option<i64>,
    pub description: Option<String>,
    pub last_modified: Option<String>,
    pub is_lsc: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct Source {
    pub id: i64,
    pub remote_id: i64,
    pub author: Option<String>,
    pub title: Option<String>,
    pub abbreviation: Option<String>,
    pub last_modified: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct Ref {
    pub id: i64,
    pub ref_id: i64,
    pub ref_text: Option<String>,
    pub last_modified: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct Test {
    pub id: i64,
    pub test_id: i64,
    pub test_name: Option<String>,
    pub test_abbr: Option<String>,
    pub group_id: Option<i64>,
    pub sort_by: Option<i64>,
    pub last_modified: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct TextConst {
    pub id: i64,
    pub remote_id: i64,
    pub const_name: Option<String>,
    pub const_value: Option<String>,
    pub group_id: Option<i64>,
    pub test_id: Option<i64>,
    pub last_modified: Option<String>,
}

/// Question to ACS association.
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct QuestionAcs {
    pub id: i64,
    pub remote_id: i64,
    pub question_id: i64,
    pub acs_id: i64,
}

/// Question to reference image association.
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct QuestionRefImage {
    pub id: i64,
    pub remote_id: i64,
    pub question_id: i64,
    pub image_id: i64,
    pub annotation: Option<String>,
}

/// Question to textual reference association.
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct QuestionReference {
    pub id: i64,
    pub remote_id: i64,
    pub question_id: i64,
    pub ref_id: i64,
}

/// Question to test association.
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct QuestionTest {
    pub id: i64,
    pub remote_id: i64,
    pub question_id: i64,
    pub test_id: i64,
    pub is_linked: Option<i64>,
    pub sort_by: Option<i64>,
    pub link_chapter: Option<i64>,
    pub is_important: Option<i64>,
}
