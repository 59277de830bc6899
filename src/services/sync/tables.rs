//! Per-table synchronizers
//!
//! One routine per remote table. Each streams every row of its table from
//! the downloaded snapshot and upserts the corresponding local record,
//! matched by the remote key. The SQL text must match the provider's
//! table and column layout exactly.

use crate::db;
use crate::models::{
    Acs, Answer, BinaryData, Chapter, FigureSection, Group, Image, Library, Question, QuestionAcs,
    QuestionRefImage, QuestionReference, QuestionTest, Ref, Source, SubjectMatterCode, Test,
    TextConst,
};
use crate::services::choice::derive_choice;
use crate::services::decryptor::{strip_markup, GsDecryptor};
use crate::Result;
use sqlx::{Row, SqlitePool};

const TEXT_CONST_QUERY: &str =
    "SELECT ID, ConstName, ConstValue, GroupID, TestID, LastMod FROM TextConst";

const SOURCES_QUERY: &str = "SELECT ID, Author, Title, Abbreviation, LastMod FROM Sources";

const TESTS_QUERY: &str =
    "SELECT TestID, TestName, TestAbbr, GroupID, SortBy, LastMod FROM Tests";

const SUBJECT_MATTER_CODES_QUERY: &str =
    "SELECT ID, Code, SourceID, Description, LastMod, IsLSC FROM SubjectMatterCodes";

const REFS_QUERY: &str = "SELECT RefID, RefText, LastMod FROM Refs";

const QUESTION_TESTS_QUERY: &str =
    "SELECT ID, QuestionID, TestID, IsLinked, SortBy, LinkChapter, IsImportant FROM QuestionsTests";

const QUESTION_REFERENCES_QUERY: &str =
    "SELECT ID, QuestionID, RefID FROM QuestionsReferences";

const QUESTION_REF_IMAGES_QUERY: &str =
    "SELECT ID, QuestionID, ImageID, Annotation FROM QuestionsRefImages";

const QUESTION_ACS_QUERY: &str = "SELECT ID, QuestionID, ACSID FROM QuestionsACS";

const LIBRARY_QUERY: &str =
    "SELECT ID, Region, ParentID, Name, Description, IsSection, Source, Ordinal, LastMod FROM Library";

const GROUPS_QUERY: &str = "SELECT GroupID, GroupName, GroupAbbr, LastMod FROM Groups";

const FIGURE_SECTIONS_QUERY: &str =
    "SELECT FigureSectionID, FigureSection, LastMod FROM FigureSections";

const CHAPTERS_QUERY: &str =
    "SELECT ChapterID, ChapterName, GroupID, SortBy, LastMod FROM Chapters";

const ACS_QUERY: &str =
    "SELECT ID, GroupID, ParentID, Code, Description, IsCompletedCode, LastMod FROM ACS";

const BINARY_DATA_QUERY: &str =
    "SELECT ID, Category, GroupID, ImageName, Desc, FileName, BinType, BinData, LastMod FROM BinaryData";

const QUESTIONS_QUERY: &str =
    "SELECT QuestionID, QuestionText, ChapterID, SMCID, SourceID, LastMod, Explanation, OldQID, LSCID FROM Questions";

const ANSWERS_QUERY: &str =
    "SELECT AnswerID, AnswerText, QuestionID, IsCorrect, LastMod FROM Answers";

const IMAGES_QUERY: &str =
    "SELECT ID, PicType, GroupID, TestID, ImageName, Desc, FileName, BinImage, LastMod, FigureSectionID, PixelsPerNM, SortBy, ImageLibraryID FROM Images";

pub(crate) async fn sync_text_const(remote: &SqlitePool, local: &SqlitePool) -> Result<u64> {
    let rows = sqlx::query(TEXT_CONST_QUERY).fetch_all(remote).await?;
    let mut count = 0;
    for row in &rows {
        let record = TextConst {
            remote_id: row.try_get(0)?,
            const_name: row.try_get(1)?,
            const_value: row.try_get(2)?,
            group_id: row.try_get(3)?,
            test_id: row.try_get(4)?,
            last_modified: row.try_get(5)?,
            ..TextConst::default()
        };
        db::catalog::upsert_text_const(local, &record).await?;
        count += 1;
    }
    Ok(count)
}

pub(crate) async fn sync_sources(remote: &SqlitePool, local: &SqlitePool) -> Result<u64> {
    let rows = sqlx::query(SOURCES_QUERY).fetch_all(remote).await?;
    let mut count = 0;
    for row in &rows {
        let record = Source {
            remote_id: row.try_get(0)?,
            author: row.try_get(1)?,
            title: row.try_get(2)?,
            abbreviation: row.try_get(3)?,
            last_modified: row.try_get(4)?,
            ..Source::default()
        };
        db::catalog::upsert_source(local, &record).await?;
        count += 1;
    }
    Ok(count)
}

pub(crate) async fn sync_tests(remote: &SqlitePool, local: &SqlitePool) -> Result<u64> {
    let rows = sqlx::query(TESTS_QUERY).fetch_all(remote).await?;
    let mut count = 0;
    for row in &rows {
        let record = Test {
            test_id: row.try_get(0)?,
            test_name: row.try_get(1)?,
            test_abbr: row.try_get(2)?,
            group_id: row.try_get(3)?,
            sort_by: row.try_get(4)?,
            last_modified: row.try_get(5)?,
            ..Test::default()
        };
        db::catalog::upsert_test(local, &record).await?;
        count += 1;
    }
    Ok(count)
}

pub(crate) async fn sync_subject_matter_codes(
    remote: &SqlitePool,
    local: &SqlitePool,
) -> Result<u64> {
    let rows = sqlx::query(SUBJECT_MATTER_CODES_QUERY)
        .fetch_all(remote)
        .await?;
    let mut count = 0;
    for row in &rows {
        let record = SubjectMatterCode {
            remote_id: row.try_get(0)?,
            code: row.try_get(1)?,
            source_id: row.try_get(2)?,
            description: row.try_get(3)?,
            last_modified: row.try_get(4)?,
            is_lsc: row.try_get(5)?,
            ..SubjectMatterCode::default()
        };
        db::catalog::upsert_subject_matter_code(local, &record).await?;
        count += 1;
    }
    Ok(count)
}

pub(crate) async fn sync_refs(remote: &SqlitePool, local: &SqlitePool) -> Result<u64> {
    let rows = sqlx::query(REFS_QUERY).fetch_all(remote).await?;
    let mut count = 0;
    for row in &rows {
        let record = Ref {
            ref_id: row.try_get(0)?,
            ref_text: row.try_get(1)?,
            last_modified: row.try_get(2)?,
            ..Ref::default()
        };
        db::catalog::upsert_ref(local, &record).await?;
        count += 1;
    }
    Ok(count)
}

pub(crate) async fn sync_question_tests(remote: &SqlitePool, local: &SqlitePool) -> Result<u64> {
    let rows = sqlx::query(QUESTION_TESTS_QUERY).fetch_all(remote).await?;
    let mut count = 0;
    for row in &rows {
        let record = QuestionTest {
            remote_id: row.try_get(0)?,
            question_id: row.try_get(1)?,
            test_id: row.try_get(2)?,
            is_linked: row.try_get(3)?,
            sort_by: row.try_get(4)?,
            link_chapter: row.try_get(5)?,
            is_important: row.try_get(6)?,
            ..QuestionTest::default()
        };
        db::relations::upsert_question_test(local, &record).await?;
        count += 1;
    }
    Ok(count)
}

pub(crate) async fn sync_question_references(
    remote: &SqlitePool,
    local: &SqlitePool,
) -> Result<u64> {
    let rows = sqlx::query(QUESTION_REFERENCES_QUERY)
        .fetch_all(remote)
        .await?;
    let mut count = 0;
    for row in &rows {
        let record = QuestionReference {
            remote_id: row.try_get(0)?,
            question_id: row.try_get(1)?,
            ref_id: row.try_get(2)?,
            ..QuestionReference::default()
        };
        db::relations::upsert_question_reference(local, &record).await?;
        count += 1;
    }
    Ok(count)
}

pub(crate) async fn sync_question_ref_images(
    remote: &SqlitePool,
    local: &SqlitePool,
) -> Result<u64> {
    let rows = sqlx::query(QUESTION_REF_IMAGES_QUERY)
        .fetch_all(remote)
        .await?;
    let mut count = 0;
    for row in &rows {
        let record = QuestionRefImage {
            remote_id: row.try_get(0)?,
            question_id: row.try_get(1)?,
            image_id: row.try_get(2)?,
            annotation: row.try_get(3)?,
            ..QuestionRefImage::default()
        };
        db::relations::upsert_question_ref_image(local, &record).await?;
        count += 1;
    }
    Ok(count)
}

pub(crate) async fn sync_question_acs(remote: &SqlitePool, local: &SqlitePool) -> Result<u64> {
    let rows = sqlx::query(QUESTION_ACS_QUERY).fetch_all(remote).await?;
    let mut count = 0;
    for row in &rows {
        let record = QuestionAcs {
            remote_id: row.try_get(0)?,
            question_id: row.try_get(1)?,
            acs_id: row.try_get(2)?,
            ..QuestionAcs::default()
        };
        db::relations::upsert_question_acs(local, &record).await?;
        count += 1;
    }
    Ok(count)
}

pub(crate) async fn sync_library(remote: &SqlitePool, local: &SqlitePool) -> Result<u64> {
    let rows = sqlx::query(LIBRARY_QUERY).fetch_all(remote).await?;
    let mut count = 0;
    for row in &rows {
        let record = Library {
            remote_id: row.try_get(0)?,
            region: row.try_get(1)?,
            parent_id: row.try_get(2)?,
            name: row.try_get(3)?,
            description: row.try_get(4)?,
            is_section: row.try_get(5)?,
            source: row.try_get(6)?,
            ordinal: row.try_get(7)?,
            last_modified: row.try_get(8)?,
            ..Library::default()
        };
        db::catalog::upsert_library(local, &record).await?;
        count += 1;
    }
    Ok(count)
}

pub(crate) async fn sync_groups(remote: &SqlitePool, local: &SqlitePool) -> Result<u64> {
    let rows = sqlx::query(GROUPS_QUERY).fetch_all(remote).await?;
    let mut count = 0;
    for row in &rows {
        let record = Group {
            group_id: row.try_get(0)?,
            group_name: row.try_get(1)?,
            group_abbr: row.try_get(2)?,
            last_modified: row.try_get(3)?,
            ..Group::default()
        };
        db::catalog::upsert_group(local, &record).await?;
        count += 1;
    }
    Ok(count)
}

pub(crate) async fn sync_figure_sections(remote: &SqlitePool, local: &SqlitePool) -> Result<u64> {
    let rows = sqlx::query(FIGURE_SECTIONS_QUERY).fetch_all(remote).await?;
    let mut count = 0;
    for row in &rows {
        let record = FigureSection {
            figure_section_id: row.try_get(0)?,
            figure_section: row.try_get(1)?,
            last_modified: row.try_get(2)?,
            ..FigureSection::default()
        };
        db::catalog::upsert_figure_section(local, &record).await?;
        count += 1;
    }
    Ok(count)
}

pub(crate) async fn sync_chapters(remote: &SqlitePool, local: &SqlitePool) -> Result<u64> {
    let rows = sqlx::query(CHAPTERS_QUERY).fetch_all(remote).await?;
    let mut count = 0;
    for row in &rows {
        let record = Chapter {
            chapter_id: row.try_get(0)?,
            chapter_name: row.try_get(1)?,
            group_id: row.try_get(2)?,
            sort_by: row.try_get(3)?,
            last_modified: row.try_get(4)?,
            ..Chapter::default()
        };
        db::catalog::upsert_chapter(local, &record).await?;
        count += 1;
    }
    Ok(count)
}

pub(crate) async fn sync_acs(remote: &SqlitePool, local: &SqlitePool) -> Result<u64> {
    let rows = sqlx::query(ACS_QUERY).fetch_all(remote).await?;
    let mut count = 0;
    for row in &rows {
        let record = Acs {
            remote_id: row.try_get(0)?,
            group_id: row.try_get(1)?,
            parent_id: row.try_get(2)?,
            code: row.try_get(3)?,
            description: row.try_get(4)?,
            is_completed_code: row.try_get(5)?,
            last_modified: row.try_get(6)?,
            ..Acs::default()
        };
        db::catalog::upsert_acs(local, &record).await?;
        count += 1;
    }
    Ok(count)
}

pub(crate) async fn sync_binary_data(remote: &SqlitePool, local: &SqlitePool) -> Result<u64> {
    let rows = sqlx::query(BINARY_DATA_QUERY).fetch_all(remote).await?;
    let mut count = 0;
    for row in &rows {
        let record = BinaryData {
            remote_id: row.try_get(0)?,
            category: row.try_get(1)?,
            group_id: row.try_get(2)?,
            image_name: row.try_get(3)?,
            description: row.try_get(4)?,
            file_name: row.try_get(5)?,
            bin_type: row.try_get(6)?,
            bin_data: row.try_get(7)?,
            last_modified: row.try_get(8)?,
            ..BinaryData::default()
        };
        db::catalog::upsert_binary_data(local, &record).await?;
        count += 1;
    }
    Ok(count)
}

/// Sync questions for one course. Question text and explanation are
/// decrypted; the explanation additionally has markup stripped.
pub(crate) async fn sync_questions(
    remote: &SqlitePool,
    local: &SqlitePool,
    decryptor: &GsDecryptor,
    course: &str,
) -> Result<u64> {
    let rows = sqlx::query(QUESTIONS_QUERY).fetch_all(remote).await?;
    let mut count = 0;
    for row in &rows {
        let text = match row.try_get::<Option<String>, _>(1)? {
            Some(raw) => Some(decryptor.decrypt(&raw)?),
            None => None,
        };
        let explanation = match row.try_get::<Option<String>, _>(6)? {
            Some(raw) => Some(strip_markup(&decryptor.decrypt(&raw)?)),
            None => None,
        };
        let record = Question {
            remote_id: row.try_get(0)?,
            course: course.to_string(),
            text,
            chapter_id: row.try_get(2)?,
            smc_id: row.try_get(3)?,
            source_id: row.try_get(4)?,
            last_modified: row.try_get(5)?,
            explanation,
            old_question_id: row.try_get(7)?,
            lsc_id: row.try_get(8)?,
            ..Question::default()
        };
        db::questions::upsert(local, &record).await?;
        count += 1;
    }
    Ok(count)
}

/// Sync answers. Text is decrypted and stripped of markup; an answer
/// without a choice letter gets the first unused one among its siblings.
pub(crate) async fn sync_answers(
    remote: &SqlitePool,
    local: &SqlitePool,
    decryptor: &GsDecryptor,
) -> Result<u64> {
    let rows = sqlx::query(ANSWERS_QUERY).fetch_all(remote).await?;
    let mut count = 0;
    for row in &rows {
        let remote_id: i64 = row.try_get(0)?;
        let question_id: i64 = row.try_get(2)?;

        let existing = db::answers::find_by_remote_id(local, remote_id).await?;
        let current_choice = existing.and_then(|a| a.choice);
        let choice = match current_choice {
            Some(choice) => choice,
            None => {
                let used = db::answers::choices_for_question(local, question_id).await?;
                derive_choice(None, &used, question_id)?
            }
        };

        let text = match row.try_get::<Option<String>, _>(1)? {
            Some(raw) => Some(strip_markup(&decryptor.decrypt(&raw)?)),
            None => None,
        };
        let record = Answer {
            remote_id,
            text,
            question_id,
            correct: row.try_get(3)?,
            choice: Some(choice),
            last_modified: row.try_get(4)?,
            ..Answer::default()
        };
        db::answers::upsert(local, &record).await?;
        count += 1;
    }
    Ok(count)
}

pub(crate) async fn sync_images(remote: &SqlitePool, local: &SqlitePool) -> Result<u64> {
    let rows = sqlx::query(IMAGES_QUERY).fetch_all(remote).await?;
    let mut count = 0;
    for row in &rows {
        let record = Image {
            remote_id: row.try_get(0)?,
            pic_type: row.try_get(1)?,
            group_id: row.try_get(2)?,
            test_id: row.try_get(3)?,
            image_name: row.try_get(4)?,
            description: row.try_get(5)?,
            file_name: row.try_get(6)?,
            bin_image: row.try_get(7)?,
            last_modified: row.try_get(8)?,
            figure_section_id: row.try_get(9)?,
            pixels_per_nm: row.try_get(10)?,
            sort_by: row.try_get(11)?,
            image_library_id: row.try_get(12)?,
            ..Image::default()
        };
        db::images::upsert(local, &record).await?;
        count += 1;
    }
    Ok(count)
}
