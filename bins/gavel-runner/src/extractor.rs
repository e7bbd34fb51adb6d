/// Fixture Extractor - Problem Statement to Fixtures
///
/// **Core Responsibility:**
/// Turn the raw text of a problem statement into ordered example fixtures.
///
/// **Two Source Conventions:**
/// - Labeled-line blocks: consecutive lines where `Input:` / `Output:` /
///   `Explanation:` markers open sections. Driven by an explicit state
///   machine so it is testable against plain text.
/// - Tagged-span blocks: `example-block` units whose `example-io` spans are
///   routed to the input or output list by their enclosing paragraph text.
///
/// **Critical Properties:**
/// - Knows nothing about how the text was fetched
/// - Both conventions feed one combined sequence in document order
/// - Composite value lists are split only on top-level commas (bracket depth
///   and quote state are tracked), and `name = value` keeps the value part
use gavel_common::error::{GavelError, Result};
use gavel_common::types::Fixture;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PRE_RE: Regex = Regex::new(r"(?is)<pre[^>]*>(.*?)</pre>").unwrap();
    static ref BLOCK_RE: Regex =
        Regex::new(r#"(?is)<[a-z][a-z0-9]*[^>]*class="[^"]*example-block[^"]*"[^>]*>"#).unwrap();
    static ref PARA_RE: Regex = Regex::new(r"(?is)<p[^>]*>(.*?)</p>").unwrap();
    static ref SPAN_RE: Regex =
        Regex::new(r#"(?is)<span[^>]*class="[^"]*example-io[^"]*"[^>]*>(.*?)</span>"#).unwrap();
    static ref TAG_RE: Regex = Regex::new(r"(?s)<[^>]+>").unwrap();
}

/// Split an accumulated text block into individual top-level values.
///
/// A comma separates values only at bracket depth 0 with the quote flag off.
/// Each chunk is trimmed; when a chunk contains `=` (named-parameter
/// notation, e.g. `nums = [1,2,3]`), only the text after the first `=` is
/// kept. Empty chunks are dropped.
pub fn split_top_level(text: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut depth: i32 = 0;
    let mut in_quotes = false;

    for ch in text.chars() {
        match ch {
            '[' => {
                depth += 1;
                current.push(ch);
            }
            ']' => {
                depth -= 1;
                current.push(ch);
            }
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            ',' if depth == 0 && !in_quotes => {
                if !current.trim().is_empty() {
                    values.push(take_value(&current));
                }
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    if !current.trim().is_empty() {
        values.push(take_value(&current));
    }

    values
}

fn take_value(chunk: &str) -> String {
    match chunk.find('=') {
        Some(pos) => chunk[pos + 1..].trim().to_string(),
        None => chunk.trim().to_string(),
    }
}

/// States of the labeled-line scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Idle,
    Input,
    Output,
    Explanation,
}

/// Scan a labeled-line block and emit one fixture per complete example.
///
/// `Input:` opens an input section (the remainder of the marker line is part
/// of it), `Output:` an output section, `Explanation:` a section discarded
/// until the next marker. An `Input:` marker arriving after a complete
/// example flushes it, so one stream may carry several examples. A fixture is
/// emitted only when both its lists are non-empty.
pub fn scan_labeled_lines(block: &str) -> Vec<Fixture> {
    let mut fixtures = Vec::new();
    let mut inputs: Vec<String> = Vec::new();
    let mut outputs: Vec<String> = Vec::new();
    let mut state = ScanState::Idle;

    for raw in block.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let lower = line.to_lowercase();

        if lower.contains("explanation:") {
            state = ScanState::Explanation;
            continue;
        }

        if let Some(pos) = lower.find("input:") {
            if !inputs.is_empty() && !outputs.is_empty() {
                fixtures.push(Fixture {
                    inputs: std::mem::take(&mut inputs),
                    outputs: std::mem::take(&mut outputs),
                });
            }
            state = ScanState::Input;
            let rest = line[pos + "input:".len()..].trim();
            if !rest.is_empty() {
                inputs.extend(split_top_level(rest));
            }
            continue;
        }

        if let Some(pos) = lower.find("output:") {
            state = ScanState::Output;
            let rest = line[pos + "output:".len()..].trim();
            if !rest.is_empty() {
                outputs.extend(split_top_level(rest));
            }
            continue;
        }

        match state {
            ScanState::Input => inputs.extend(split_top_level(line)),
            ScanState::Output => outputs.extend(split_top_level(line)),
            ScanState::Idle | ScanState::Explanation => {}
        }
    }

    if !inputs.is_empty() && !outputs.is_empty() {
        fixtures.push(Fixture { inputs, outputs });
    }

    fixtures
}

/// Extract every fixture from a problem document.
///
/// HTML documents contribute `<pre>` blocks (labeled-line convention) and
/// `example-block` units (tagged-span convention); plain text is processed as
/// one labeled-line stream. Fixtures from both conventions are merged by the
/// position of their source block in the document.
pub fn extract(document: &str) -> Result<Vec<Fixture>> {
    let mut found: Vec<(usize, Fixture)> = Vec::new();
    let saw_markup = PRE_RE.is_match(document) || BLOCK_RE.is_match(document);

    if saw_markup {
        for cap in PRE_RE.captures_iter(document) {
            let whole = match cap.get(0) {
                Some(m) => m,
                None => continue,
            };
            let inner = decode_entities(&strip_tags(cap.get(1).map_or("", |m| m.as_str())));
            for fixture in scan_labeled_lines(&inner) {
                found.push((whole.start(), fixture));
            }
        }
        found.extend(extract_example_blocks(document));
    } else {
        for fixture in scan_labeled_lines(document) {
            found.push((0, fixture));
        }
    }

    // Stable sort keeps same-block fixtures in emission order.
    found.sort_by_key(|(offset, _)| *offset);
    let fixtures: Vec<Fixture> = found.into_iter().map(|(_, fx)| fx).collect();

    if fixtures.is_empty() {
        return Err(GavelError::ExtractionFailure);
    }
    Ok(fixtures)
}

/// Tagged-span convention: each `example-block` unit holds paragraphs whose
/// text decides whether their `example-io` spans are inputs or outputs.
fn extract_example_blocks(document: &str) -> Vec<(usize, Fixture)> {
    let starts: Vec<usize> = BLOCK_RE.find_iter(document).map(|m| m.start()).collect();
    let mut found = Vec::new();

    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(document.len());
        let block = &document[start..end];

        let mut inputs = Vec::new();
        let mut outputs = Vec::new();

        for pcap in PARA_RE.captures_iter(block) {
            let para = pcap.get(1).map_or("", |m| m.as_str());
            let para_text = strip_tags(para).to_lowercase();
            let is_input = para_text.contains("input:");
            let is_output = para_text.contains("output:");
            if !is_input && !is_output {
                continue;
            }

            for scap in SPAN_RE.captures_iter(para) {
                let text = decode_entities(&strip_tags(scap.get(1).map_or("", |m| m.as_str())));
                if is_input {
                    inputs.push(take_value(&text));
                } else {
                    outputs.push(text.trim().to_string());
                }
            }
        }

        if !inputs.is_empty() && !outputs.is_empty() {
            found.push((start, Fixture { inputs, outputs }));
        }
    }

    found
}

fn strip_tags(html: &str) -> String {
    TAG_RE.replace_all(html, "").into_owned()
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_top_level_commas_only() {
        let values = split_top_level("nums = [[1,2],[3,4]], target = 7");
        assert_eq!(values, vec!["[[1,2],[3,4]]", "7"]);
    }

    #[test]
    fn quoted_commas_do_not_split() {
        let values = split_top_level(r#""a,b", 5"#);
        assert_eq!(values, vec![r#""a,b""#, "5"]);
    }

    #[test]
    fn named_parameter_keeps_value_after_equals() {
        let values = split_top_level("s = \"abc\"");
        assert_eq!(values, vec!["\"abc\""]);
    }

    #[test]
    fn plain_values_are_trimmed() {
        let values = split_top_level("  [1,2,3] ,  42 ");
        assert_eq!(values, vec!["[1,2,3]", "42"]);
    }

    #[test]
    fn labeled_block_yields_one_fixture() {
        let fixtures = scan_labeled_lines("Input: nums = [1,2,3]\nOutput: [1,2,3]");
        assert_eq!(fixtures.len(), 1);
        assert_eq!(fixtures[0].inputs, vec!["[1,2,3]"]);
        assert_eq!(fixtures[0].outputs, vec!["[1,2,3]"]);
    }

    #[test]
    fn explanation_content_is_discarded() {
        let text = "Input: nums = [2,7], target = 9\n\
                    Output: [0,1]\n\
                    Explanation: Because nums[0] + nums[1] == 9,\n\
                    we return [0, 1].";
        let fixtures = scan_labeled_lines(text);
        assert_eq!(fixtures.len(), 1);
        assert_eq!(fixtures[0].inputs, vec!["[2,7]", "9"]);
        assert_eq!(fixtures[0].outputs, vec!["[0,1]"]);
    }

    #[test]
    fn second_input_marker_starts_a_new_fixture() {
        let text = "Input: n = 3\nOutput: 6\nInput: n = 4\nOutput: 24";
        let fixtures = scan_labeled_lines(text);
        assert_eq!(fixtures.len(), 2);
        assert_eq!(fixtures[0].inputs, vec!["3"]);
        assert_eq!(fixtures[1].outputs, vec!["24"]);
    }

    #[test]
    fn input_marker_exits_explanation_state() {
        let text = "Input: n = 1\nOutput: 1\nExplanation: trivial case\nInput: n = 2\nOutput: 2";
        let fixtures = scan_labeled_lines(text);
        assert_eq!(fixtures.len(), 2);
    }

    #[test]
    fn multi_line_sections_accumulate() {
        let text = "Input:\nnums = [1,2,3]\nk = 2\nOutput:\n[2,3]";
        let fixtures = scan_labeled_lines(text);
        assert_eq!(fixtures.len(), 1);
        assert_eq!(fixtures[0].inputs, vec!["[1,2,3]", "2"]);
    }

    #[test]
    fn incomplete_example_is_not_emitted() {
        assert!(scan_labeled_lines("Input: n = 3").is_empty());
        assert!(scan_labeled_lines("Output: 6").is_empty());
    }

    #[test]
    fn pre_blocks_are_scanned_with_tags_stripped() {
        let html = "<p>Given an array.</p>\
                    <pre><strong>Input:</strong> nums = [1,2,3]\n\
                    <strong>Output:</strong> [1,2,3]\n</pre>";
        let fixtures = extract(html).unwrap();
        assert_eq!(fixtures.len(), 1);
        assert_eq!(fixtures[0].inputs, vec!["[1,2,3]"]);
    }

    #[test]
    fn tagged_span_blocks_are_extracted() {
        let html = r#"<div class="example-block">
            <p><strong>Input:</strong> <span class="example-io">nums = [3,1]</span></p>
            <p><strong>Output:</strong> <span class="example-io">[1,3]</span></p>
            </div>"#;
        let fixtures = extract(html).unwrap();
        assert_eq!(fixtures.len(), 1);
        assert_eq!(fixtures[0].inputs, vec!["[3,1]"]);
        assert_eq!(fixtures[0].outputs, vec!["[1,3]"]);
    }

    #[test]
    fn conventions_merge_in_document_order() {
        let html = r#"<div class="example-block">
            <p><strong>Input:</strong> <span class="example-io">n = 1</span></p>
            <p><strong>Output:</strong> <span class="example-io">1</span></p>
            </div>
            <pre>Input: n = 2
            Output: 4
            </pre>"#;
        let fixtures = extract(html).unwrap();
        assert_eq!(fixtures.len(), 2);
        assert_eq!(fixtures[0].inputs, vec!["1"]);
        assert_eq!(fixtures[1].inputs, vec!["2"]);
    }

    #[test]
    fn plain_text_is_one_labeled_stream() {
        let text = "Input: s = \"ab\"\nOutput: \"ba\"";
        let fixtures = extract(text).unwrap();
        assert_eq!(fixtures.len(), 1);
        assert_eq!(fixtures[0].inputs, vec!["\"ab\""]);
    }

    #[test]
    fn no_examples_is_an_extraction_failure() {
        let err = extract("Just some prose with no examples.").unwrap_err();
        assert!(matches!(err, GavelError::ExtractionFailure));
    }
}
