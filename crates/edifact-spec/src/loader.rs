//! Message spec file loader (EDMD)
//!
//! An EDMD file describes one message type. The header is positional:
//! name at line 6, id at line 34, version at 35, release at 36,
//! controlling agency at 37, revision at 39, date at 40 (`YYYY-MM-DD`),
//! and a `SOURCE: <text>` line at 47. The segment table follows as rows
//! tagged with a numeric position: plain segment rows, group-opening rows
//! (`----- Segment group N -----`), and trailing `+` markers each closing
//! one group nesting level.
//!
//! Any header field that fails to parse is fatal for the file.

use crate::message::{GroupSpecNode, MessageSpec, MsgSpecNode, SegSpecNode};
use crate::segment::{SegSpec, SegSpecMap};
use crate::{Error, Result};
use chrono::NaiveDate;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

// 0-based indices of the fixed header lines.
const LINE_NAME: usize = 5;
const LINE_ID: usize = 33;
const LINE_VERSION: usize = 34;
const LINE_RELEASE: usize = 35;
const LINE_CONTR_AGENCY: usize = 36;
const LINE_REVISION: usize = 38;
const LINE_DATE: usize = 39;
const LINE_SOURCE: usize = 46;

/// Parser for EDMD message specification files
pub struct MessageSpecParser {
    seg_specs: SegSpecMap,
}

impl MessageSpecParser {
    pub fn new(seg_specs: SegSpecMap) -> Self {
        Self { seg_specs }
    }

    /// Parse a single spec file
    pub fn parse_spec_file(&self, path: impl AsRef<Path>) -> Result<MessageSpec> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        self.parse_spec_text(&path.display().to_string(), &contents)
    }

    /// Parse spec file contents; `file` labels errors
    pub fn parse_spec_text(&self, file: &str, contents: &str) -> Result<MessageSpec> {
        let lines: Vec<&str> = contents.lines().collect();
        if lines.len() <= LINE_SOURCE {
            return Err(spec_file_error(
                file,
                format!("expected at least {} header lines, got {}", LINE_SOURCE + 1, lines.len()),
            ));
        }

        let name = header_field(file, &lines, LINE_NAME, "message name")?;
        let id = header_field(file, &lines, LINE_ID, "message id")?;
        let version = header_field(file, &lines, LINE_VERSION, "version")?;
        let release = header_field(file, &lines, LINE_RELEASE, "release")?;
        let contr_agency = header_field(file, &lines, LINE_CONTR_AGENCY, "controlling agency")?;
        let revision = header_field(file, &lines, LINE_REVISION, "revision")?;
        let date_str = header_field(file, &lines, LINE_DATE, "date")?;
        let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
            .map_err(|e| spec_file_error(file, format!("invalid date '{date_str}': {e}")))?;
        let source = parse_source(file, lines[LINE_SOURCE])?;

        let top_level = self.parse_segment_table(file, &lines[LINE_SOURCE + 1..])?;

        let spec = MessageSpec::new(
            id, name, version, release, contr_agency, revision, date, source, top_level,
        );
        spec.validate_structure()?;
        debug!(id = %spec.id, version = %spec.version, release = %spec.release, "parsed message spec");
        Ok(spec)
    }

    /// Parse every spec file in `dir` whose name carries the version suffix
    /// (e.g. `AUTHOR_D.14B` for suffix `D.14B`)
    pub fn parse_spec_dir(&self, dir: impl AsRef<Path>, suffix: &str) -> Result<Vec<MessageSpec>> {
        let mut specs = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if file_name.ends_with(&format!("_{suffix}")) {
                specs.push(self.parse_spec_file(entry.path())?);
            }
        }
        specs.sort_by(|a, b| a.id.cmp(&b.id));
        info!(count = specs.len(), suffix, "loaded message specs");
        Ok(specs)
    }

    fn parse_segment_table(&self, file: &str, lines: &[&str]) -> Result<Vec<MsgSpecNode>> {
        // Stack of open nesting levels; the bottom is the top level of the
        // message, every other entry is a group under construction.
        let mut stack: Vec<(Option<GroupHeader>, Vec<MsgSpecNode>)> = vec![(None, Vec::new())];

        for line in lines {
            let Some(row) = split_table_row(line) else {
                continue;
            };
            let (core, closes) = strip_markers(row.rest);

            if let Some(group) = parse_group_row(core) {
                // The trailing '+' of a group row is the opening corner of
                // its bracket, never a close marker.
                let group = group.map_err(|message| spec_file_error(file, message))?;
                stack.push((Some(group), Vec::new()));
                continue;
            }

            let seg =
                parse_segment_row(core).map_err(|message| spec_file_error(file, message))?;
            let spec = self.resolve_seg_spec(&seg.tag, &seg.name);
            let node = MsgSpecNode::Seg(SegSpecNode::new(spec, seg.mandatory, seg.max_repeats));
            push_node(&mut stack, node);

            for _ in 0..closes {
                let Some((Some(header), children)) = stack.pop() else {
                    return Err(spec_file_error(
                        file,
                        format!("unbalanced group close at position {}", row.position),
                    ));
                };
                let node = MsgSpecNode::Group(GroupSpecNode::new(
                    header.name,
                    header.mandatory,
                    header.max_repeats,
                    children,
                ));
                push_node(&mut stack, node);
            }
        }

        match stack.pop() {
            Some((None, top_level)) if stack.is_empty() => {
                if top_level.is_empty() {
                    Err(spec_file_error(file, "no segment table found".to_string()))
                } else {
                    Ok(top_level)
                }
            }
            _ => Err(spec_file_error(file, "unclosed segment group".to_string())),
        }
    }

    fn resolve_seg_spec(&self, tag: &str, name: &str) -> Arc<SegSpec> {
        match self.seg_specs.get(tag) {
            Some(spec) => Arc::clone(spec),
            // Without the segment catalog only the tag is known; a bare
            // spec still supports structure validation.
            None => Arc::new(SegSpec::bare(tag, name)),
        }
    }
}

struct TableRow<'a> {
    position: &'a str,
    rest: &'a str,
}

struct GroupHeader {
    name: String,
    mandatory: bool,
    max_repeats: u32,
}

struct SegmentRow {
    tag: String,
    name: String,
    mandatory: bool,
    max_repeats: u32,
}

fn spec_file_error(file: &str, message: String) -> Error {
    Error::SpecFile {
        file: file.to_string(),
        message,
    }
}

fn header_field(file: &str, lines: &[&str], index: usize, what: &str) -> Result<String> {
    let value = lines[index].trim();
    if value.is_empty() {
        return Err(spec_file_error(
            file,
            format!("missing {what} at line {}", index + 1),
        ));
    }
    Ok(value.to_string())
}

fn parse_source(file: &str, line: &str) -> Result<String> {
    line.trim()
        .strip_prefix("SOURCE: ")
        .map(|s| s.trim_end().to_string())
        .ok_or_else(|| spec_file_error(file, format!("could not get source from '{line}'")))
}

/// A table row starts with a numeric position tag (e.g. `00010`)
fn split_table_row(line: &str) -> Option<TableRow<'_>> {
    let trimmed = line.trim_start();
    let position = trimmed.split_whitespace().next()?;
    if position.len() < 4 || !position.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let rest = trimmed[position.len()..].trim();
    if rest.is_empty() {
        return None;
    }
    Some(TableRow { position, rest })
}

/// Strip trailing nesting markers, counting one group close per `+`
fn strip_markers(row: &str) -> (&str, usize) {
    let core = row.trim_end_matches(['+', '|', '-', ' ']);
    let closes = row[core.len()..].chars().filter(|c| *c == '+').count();
    (core, closes)
}

/// `----- Segment group 1  ------------------ C   99` (markers stripped)
fn parse_group_row(core: &str) -> Option<std::result::Result<GroupHeader, String>> {
    let idx = core.find("Segment group")?;
    let after = &core[idx + "Segment group".len()..];
    Some(parse_group_fields(core, after))
}

fn parse_group_fields(core: &str, after: &str) -> std::result::Result<GroupHeader, String> {
    let cleaned: String = after.chars().map(|c| if c == '-' { ' ' } else { c }).collect();
    let mut fields = cleaned.split_whitespace();
    let number = fields
        .next()
        .ok_or_else(|| format!("group row '{core}': missing group number"))?;
    if !number.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("group row '{core}': invalid group number '{number}'"));
    }
    let status = fields
        .next()
        .ok_or_else(|| format!("group row '{core}': missing status"))?;
    let count = fields
        .next()
        .ok_or_else(|| format!("group row '{core}': missing repeat count"))?;
    Ok(GroupHeader {
        name: format!("Group_{number}"),
        mandatory: parse_status(core, status)?,
        max_repeats: parse_count(core, count)?,
    })
}

/// `UNH Message header  M   1` (markers stripped)
fn parse_segment_row(core: &str) -> std::result::Result<SegmentRow, String> {
    let fields: Vec<&str> = core.split_whitespace().collect();
    if fields.len() < 3 {
        return Err(format!("segment row '{core}': expected tag, status and count"));
    }
    let tag = fields[0];
    if tag.len() != 3 || !tag.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(format!("segment row '{core}': invalid segment tag '{tag}'"));
    }
    let count = fields[fields.len() - 1];
    let status = fields[fields.len() - 2];
    let name = fields[1..fields.len() - 2].join(" ");
    Ok(SegmentRow {
        tag: tag.to_string(),
        name,
        mandatory: parse_status(core, status)?,
        max_repeats: parse_count(core, count)?,
    })
}

fn parse_status(core: &str, status: &str) -> std::result::Result<bool, String> {
    match status {
        "M" => Ok(true),
        "C" => Ok(false),
        other => Err(format!("row '{core}': invalid status '{other}'")),
    }
}

fn parse_count(core: &str, count: &str) -> std::result::Result<u32, String> {
    count
        .parse()
        .map_err(|_| format!("row '{core}': invalid repeat count '{count}'"))
}

fn push_node(stack: &mut Vec<(Option<GroupHeader>, Vec<MsgSpecNode>)>, node: MsgSpecNode) {
    if let Some((_, children)) = stack.last_mut() {
        children.push(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MsgSpecNode;
    use std::collections::HashMap;

    /// Build file contents with the header fields at their fixed lines
    /// followed by the given segment table rows.
    fn spec_text(date: &str, table: &[&str]) -> String {
        let mut lines = vec![String::new(); LINE_SOURCE + 1];
        lines[LINE_NAME] = "            Authorization message".to_string();
        lines[LINE_ID] = "  AUTHOR".to_string();
        lines[LINE_VERSION] = "  D".to_string();
        lines[LINE_RELEASE] = "  14B".to_string();
        lines[LINE_CONTR_AGENCY] = "  UN".to_string();
        lines[LINE_REVISION] = "  1".to_string();
        lines[LINE_DATE] = format!("  {date}");
        lines[LINE_SOURCE] = "SOURCE: TBG12 Accounting and auditing".to_string();
        lines.push(String::new());
        for row in table {
            lines.push((*row).to_string());
        }
        lines.join("\n")
    }

    const AUTHOR_TABLE: &[&str] = &[
        "00010   UNH Message header                           M   1     ",
        "00020   BGM Beginning of message                     M   1     ",
        "00030   DTM Date/time/period                         C   1     ",
        "00040   BUS Business function                        C   1     ",
        "",
        "00050       ----- Segment group 4  ------------------ M   99---------------+",
        "00060   LIN Line item                                M   1----------------+",
        "",
        "00070       ----- Segment group 7  ------------------ C   2----------------+",
        "00080   FII Financial institution information        M   1                 |",
        "00090   CTA Contact information                      C   1                 |",
        "00100   COM Communication contact                    C   9----------------+",
        "",
        "00110   UNT Message trailer                          M   1     ",
    ];

    fn parse(table: &[&str]) -> crate::Result<MessageSpec> {
        let parser = MessageSpecParser::new(HashMap::new());
        parser.parse_spec_text("AUTHOR_D.14B", &spec_text("2014-11-17", table))
    }

    #[test]
    fn test_header_fields() {
        let spec = parse(AUTHOR_TABLE).unwrap();
        assert_eq!(spec.id, "AUTHOR");
        assert_eq!(spec.name, "Authorization message");
        assert_eq!(spec.version, "D");
        assert_eq!(spec.release, "14B");
        assert_eq!(spec.contr_agency, "UN");
        assert_eq!(spec.revision, "1");
        assert_eq!(
            spec.date,
            NaiveDate::from_ymd_opt(2014, 11, 17).expect("valid date")
        );
        assert_eq!(spec.source, "TBG12 Accounting and auditing");
    }

    #[test]
    fn test_malformed_date_is_fatal() {
        let parser = MessageSpecParser::new(HashMap::new());
        let result =
            parser.parse_spec_text("AUTHOR_D.14B", &spec_text("14-11-17", AUTHOR_TABLE));
        assert!(matches!(result, Err(Error::SpecFile { .. })));
    }

    #[test]
    fn test_missing_source_is_fatal() {
        let parser = MessageSpecParser::new(HashMap::new());
        let mut text = spec_text("2014-11-17", AUTHOR_TABLE);
        text = text.replace("SOURCE: ", "ORIGIN: ");
        let result = parser.parse_spec_text("AUTHOR_D.14B", &text);
        assert!(matches!(result, Err(Error::SpecFile { .. })));
    }

    #[test]
    fn test_segment_table_structure() {
        let spec = parse(AUTHOR_TABLE).unwrap();
        assert_eq!(spec.top_level.len(), 7);

        match &spec.top_level[0] {
            MsgSpecNode::Seg(seg) => {
                assert_eq!(seg.id(), "UNH");
                assert!(seg.mandatory);
                assert_eq!(seg.max_repeats, 1);
            }
            MsgSpecNode::Group(_) => panic!("expected UNH segment node"),
        }

        match &spec.top_level[4] {
            MsgSpecNode::Group(grp) => {
                assert_eq!(grp.name, "Group_4");
                assert!(grp.mandatory);
                assert_eq!(grp.max_repeats, 99);
                assert_eq!(grp.trigger_id(), Some("LIN"));
                assert_eq!(grp.children.len(), 1);
            }
            MsgSpecNode::Seg(_) => panic!("expected Group_4"),
        }

        match &spec.top_level[5] {
            MsgSpecNode::Group(grp) => {
                assert_eq!(grp.name, "Group_7");
                assert!(!grp.mandatory);
                assert_eq!(grp.max_repeats, 2);
                assert_eq!(grp.trigger_id(), Some("FII"));
                assert_eq!(grp.children.len(), 3);
            }
            MsgSpecNode::Seg(_) => panic!("expected Group_7"),
        }
    }

    #[test]
    fn test_nested_groups_close_with_stacked_markers() {
        let table = &[
            "00010   UNH Message header                           M   1     ",
            "00020       ----- Segment group 1  ------------------ M   9----------------+",
            "00030   RFF Reference                                M   1                 |",
            "00040       ----- Segment group 2  ------------------ C   5---------------+|",
            "00050   DTM Date/time/period                         M   1----------------++",
            "00060   UNT Message trailer                          M   1     ",
        ];
        let spec = parse(table).unwrap();
        assert_eq!(spec.top_level.len(), 3);
        match &spec.top_level[1] {
            MsgSpecNode::Group(grp) => {
                assert_eq!(grp.name, "Group_1");
                assert_eq!(grp.children.len(), 2);
                match &grp.children[1] {
                    MsgSpecNode::Group(inner) => {
                        assert_eq!(inner.name, "Group_2");
                        assert_eq!(inner.trigger_id(), Some("DTM"));
                    }
                    MsgSpecNode::Seg(_) => panic!("expected nested Group_2"),
                }
            }
            MsgSpecNode::Seg(_) => panic!("expected Group_1"),
        }
    }

    #[test]
    fn test_unclosed_group_is_fatal() {
        let table = &[
            "00010   UNH Message header                           M   1     ",
            "00020       ----- Segment group 1  ------------------ M   9----------------+",
            "00030   RFF Reference                                M   1                 |",
        ];
        assert!(matches!(parse(table), Err(Error::SpecFile { .. })));
    }

    #[test]
    fn test_known_tags_resolve_against_catalog() {
        let mut seg_specs: SegSpecMap = HashMap::new();
        seg_specs.insert(
            "UNH".to_string(),
            Arc::new(SegSpec::bare("UNH", "Message header")),
        );
        let parser = MessageSpecParser::new(seg_specs);
        let spec = parser
            .parse_spec_text("AUTHOR_D.14B", &spec_text("2014-11-17", AUTHOR_TABLE))
            .unwrap();
        match &spec.top_level[0] {
            MsgSpecNode::Seg(seg) => assert_eq!(seg.spec.name, "Message header"),
            MsgSpecNode::Group(_) => panic!("expected segment node"),
        }
    }

    #[test]
    fn test_spec_dir_scan() {
        let dir = std::env::temp_dir().join(format!(
            "edifact-spec-loader-{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .expect("system time after epoch")
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        std::fs::write(
            dir.join("AUTHOR_D.14B"),
            spec_text("2014-11-17", AUTHOR_TABLE),
        )
        .expect("write spec file");
        std::fs::write(dir.join("README"), "not a spec").expect("write other file");

        let parser = MessageSpecParser::new(HashMap::new());
        let specs = parser.parse_spec_dir(&dir, "D.14B").unwrap();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].id, "AUTHOR");

        std::fs::remove_dir_all(&dir).ok();
    }
}
