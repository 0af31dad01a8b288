//! `gantry check`: evaluate, schema-check and drift-check every workflow.
//!
//! Every definition is checked even after a failure, so one run reports everything
//! that needs fixing.

use anyhow::Context as _;
use gantry_tooling::template_engine::TemplateEngine;
use gantry_tooling::validator::WorkflowValidator;
use gantry_tooling::{Definition, GantryContext, Severity, ValidationResult};

use crate::output;

pub(crate) fn handle_check_command(
    context: &GantryContext,
    show_diffs: bool,
) -> anyhow::Result<()> {
    let engine = TemplateEngine::new(context);
    let definitions = engine
        .evaluate_all()
        .context("failed to evaluate templates")?;
    let validator = WorkflowValidator::new(context);

    let mut failures = super::report_dependency_failures(&engine);
    let mut drifted = false;

    if definitions.is_empty() {
        output::warning(format!(
            "No templates found under {}",
            context.templates_dir().display()
        ));
    }

    for definition in &definitions {
        let result = check_definition(&validator, definition)?;
        output::check_status(&definition.name, result.valid);
        for message in &result.messages {
            match message.severity {
                Severity::Error => output::failure_detail(&message.text),
                Severity::Info => output::dim(format!("  {}", message.text)),
            }
        }
        if !result.valid {
            failures += 1;
            drifted |= !result.actual_content.is_empty();
            if show_diffs && !result.actual_content.is_empty() {
                for line in line_diff(&result.actual_content, &definition.content) {
                    match line {
                        DiffLine::Found(text) => output::diff_line(true, text),
                        DiffLine::Generated(text) => output::diff_line(false, text),
                    }
                }
            }
        }
    }

    if failures > 0 {
        if drifted {
            output::blank();
            output::hint("Run `gantry update` to regenerate out-of-date workflows.");
        }
        anyhow::bail!("workflow check failed with {failures} problem(s)");
    }

    Ok(())
}

/// A line present on only one side of a drift.
#[derive(Debug, PartialEq, Eq)]
enum DiffLine<'a> {
    Found(&'a str),
    Generated(&'a str),
}

/// Lines that differ between the destination on disk and the generated content, in
/// document order. Lines common to both (by longest common subsequence) are omitted.
fn line_diff<'a>(found: &'a str, generated: &'a str) -> Vec<DiffLine<'a>> {
    let old: Vec<&str> = found.lines().collect();
    let new: Vec<&str> = generated.lines().collect();

    // lcs[i][j]: common subsequence length of old[i..] and new[j..]
    let mut lcs = vec![vec![0usize; new.len() + 1]; old.len() + 1];
    for i in (0..old.len()).rev() {
        for j in (0..new.len()).rev() {
            lcs[i][j] = if old[i] == new[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut diff = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < old.len() && j < new.len() {
        if old[i] == new[j] {
            i += 1;
            j += 1;
        } else if lcs[i + 1][j] >= lcs[i][j + 1] {
            diff.push(DiffLine::Found(old[i]));
            i += 1;
        } else {
            diff.push(DiffLine::Generated(new[j]));
            j += 1;
        }
    }
    diff.extend(old[i..].iter().copied().map(DiffLine::Found));
    diff.extend(new[j..].iter().copied().map(DiffLine::Generated));
    diff
}

/// Evaluation, then schema, then content. The first failing check wins.
fn check_definition(
    validator: &WorkflowValidator<'_>,
    definition: &Definition,
) -> anyhow::Result<ValidationResult> {
    if !definition.status.valid {
        return Ok(definition.status.clone());
    }

    let schema = validator.validate_schema(definition)?;
    if !schema.valid {
        return Ok(schema);
    }

    let content = validator.validate_content(definition)?;
    if !content.valid {
        return Ok(content);
    }

    // Keep informational messages (skipped checks) from both passes
    let mut passed = ValidationResult::valid();
    passed.messages = schema.messages;
    passed.messages.extend(content.messages);
    Ok(passed)
}
