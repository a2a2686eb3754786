//! Policy DSL compiler
//!
//! Compiles the small line-oriented policy DSL into a [`PolicyDocument`].
//! Compilation fails closed: any syntax or semantic error rejects the whole
//! document with a [`CompileError`] carrying the offending line; a partially
//! valid policy is never produced.
//!
//! # Grammar
//!
//! ```text
//! # comment
//! policy "Research Export"
//! style brackets              # brackets | numbered | asterisks | empty
//! enable ALL                  # or: enable NAME SSN PHONE ...
//! disable DATE AGE
//! threshold default 0.65
//! threshold NAME 0.8
//! age-threshold 90            # 0..=90; 0 redacts every age mention
//! zip keep-prefix             # or: zip full
//! ocr on                      # or: ocr off
//! ```

use crate::domain::{CompileError, PhiCategory, ALL_PHI_TYPES};
use crate::policy::document::{PolicyDocument, ReplacementStyle};
use std::collections::BTreeMap;

/// Compile DSL text into a policy document.
///
/// # Errors
///
/// Returns the first [`CompileError`] encountered, with its 1-based source
/// line where derivable.
pub fn compile(source: &str) -> Result<PolicyDocument, CompileError> {
    let mut name: Option<String> = None;
    let mut style = ReplacementStyle::Brackets;
    let mut enabled_types: Option<Vec<String>> = None;
    let mut disabled_types: Vec<String> = Vec::new();
    let mut default_threshold = 0.7;
    let mut thresholds: BTreeMap<String, f64> = BTreeMap::new();
    let mut age_threshold = 0u32;
    let mut zip_keep_prefix = false;
    let mut ocr_normalization = false;
    let mut saw_directive = false;

    for (idx, raw_line) in source.lines().enumerate() {
        let line_no = idx + 1;
        let line = strip_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }
        saw_directive = true;

        let mut parts = line.split_whitespace();
        let directive = parts.next().unwrap_or_default().to_ascii_lowercase();
        let args: Vec<&str> = parts.collect();

        match directive.as_str() {
            "policy" => {
                let rest = line["policy".len()..].trim();
                let value = rest.trim_matches('"').trim();
                if value.is_empty() {
                    return Err(CompileError::at_line(line_no, "policy requires a name"));
                }
                name = Some(value.to_string());
            }
            "style" => {
                let arg = single_arg(&args, line_no, "style")?;
                style = ReplacementStyle::parse(arg).ok_or_else(|| {
                    CompileError::at_line(
                        line_no,
                        format!(
                            "unknown style '{arg}' (expected brackets, numbered, asterisks, or empty)"
                        ),
                    )
                })?;
            }
            "enable" => {
                if args.is_empty() {
                    return Err(CompileError::at_line(
                        line_no,
                        "enable requires ALL or a category list",
                    ));
                }
                if args.len() == 1 && args[0].eq_ignore_ascii_case("all") {
                    enabled_types = None;
                } else {
                    let mut list = enabled_types.take().unwrap_or_default();
                    for arg in &args {
                        let category = parse_category(arg, line_no)?;
                        if disabled_types
                            .iter()
                            .any(|d| PhiCategory::parse_label(d) == Some(category))
                        {
                            return Err(conflict(category, line_no));
                        }
                        list.push(category.label().to_string());
                    }
                    enabled_types = Some(list);
                }
            }
            "disable" => {
                if args.is_empty() {
                    return Err(CompileError::at_line(
                        line_no,
                        "disable requires a category list",
                    ));
                }
                for arg in &args {
                    let category = parse_category(arg, line_no)?;
                    if let Some(list) = &enabled_types {
                        if list
                            .iter()
                            .any(|e| PhiCategory::parse_label(e) == Some(category))
                        {
                            return Err(conflict(category, line_no));
                        }
                    }
                    disabled_types.push(category.label().to_string());
                }
            }
            "threshold" => {
                if args.len() != 2 {
                    return Err(CompileError::at_line(
                        line_no,
                        "threshold requires a category (or 'default') and a value",
                    ));
                }
                let value: f64 = args[1].parse().map_err(|_| {
                    CompileError::at_line(line_no, format!("invalid threshold '{}'", args[1]))
                })?;
                if !(0.0..=1.0).contains(&value) {
                    return Err(CompileError::at_line(
                        line_no,
                        format!("threshold {value} out of range [0, 1]"),
                    ));
                }
                if args[0].eq_ignore_ascii_case("default") {
                    default_threshold = value;
                } else {
                    let category = parse_category(args[0], line_no)?;
                    thresholds.insert(category.label().to_string(), value);
                }
            }
            "age-threshold" => {
                let arg = single_arg(&args, line_no, "age-threshold")?;
                let value: u32 = arg.parse().map_err(|_| {
                    CompileError::at_line(line_no, format!("invalid age threshold '{arg}'"))
                })?;
                if value > 90 {
                    return Err(CompileError::at_line(
                        line_no,
                        format!("age threshold {value} above the Safe Harbor floor of 90"),
                    ));
                }
                age_threshold = value;
            }
            "zip" => {
                let arg = single_arg(&args, line_no, "zip")?;
                match arg.to_ascii_lowercase().as_str() {
                    "keep-prefix" => zip_keep_prefix = true,
                    "full" => zip_keep_prefix = false,
                    other => {
                        return Err(CompileError::at_line(
                            line_no,
                            format!("unknown zip mode '{other}' (expected keep-prefix or full)"),
                        ))
                    }
                }
            }
            "ocr" => {
                let arg = single_arg(&args, line_no, "ocr")?;
                match arg.to_ascii_lowercase().as_str() {
                    "on" => ocr_normalization = true,
                    "off" => ocr_normalization = false,
                    other => {
                        return Err(CompileError::at_line(
                            line_no,
                            format!("ocr expects on or off, got '{other}'"),
                        ))
                    }
                }
            }
            other => {
                return Err(CompileError::at_line(
                    line_no,
                    format!(
                        "unknown directive '{other}' (expected policy, style, enable, disable, \
                         threshold, age-threshold, zip, or ocr)"
                    ),
                ));
            }
        }
    }

    if !saw_directive {
        return Err(CompileError::new("empty policy document"));
    }

    Ok(PolicyDocument {
        name: name.unwrap_or_else(|| "unnamed policy".to_string()),
        style,
        enabled_types,
        disabled_types,
        default_threshold,
        thresholds,
        age_threshold,
        zip_keep_prefix,
        ocr_normalization,
    })
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn single_arg<'a>(args: &[&'a str], line_no: usize, directive: &str) -> Result<&'a str, CompileError> {
    if args.len() != 1 {
        return Err(CompileError::at_line(
            line_no,
            format!("{directive} requires exactly one argument"),
        ));
    }
    Ok(args[0])
}

fn parse_category(label: &str, line_no: usize) -> Result<PhiCategory, CompileError> {
    PhiCategory::parse_label(label).ok_or_else(|| {
        CompileError::at_line(
            line_no,
            format!(
                "unknown category '{}' (expected one of: {})",
                label,
                ALL_PHI_TYPES
                    .iter()
                    .map(|c| c.label())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        )
    })
}

fn conflict(category: PhiCategory, line_no: usize) -> CompileError {
    CompileError::at_line(
        line_no,
        format!("category '{category}' is both enabled and disabled"),
    )
}
