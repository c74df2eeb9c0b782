//! `inspect`: human-readable summaries of workflows and steps.

use std::fmt::Write as _;

use notiflow_core::domain::StepIssues;
use notiflow_core::{
    CreateWorkflowDto, ListWorkflowResponse, ResponseStep, UpdateWorkflowDto, UpsertStep,
    WireModel, WorkflowResponseDto,
};

use crate::commands::DocumentKind;
use crate::error::CliError;
use crate::presentation::{format_optional, format_timestamp, separator, truncate_string};

const TABLE_WIDTH: usize = 88;

pub fn execute(kind: DocumentKind, input: &[u8]) -> Result<String, CliError> {
    match kind {
        DocumentKind::Workflow => Ok(workflow(&WorkflowResponseDto::decode(input)?)),
        DocumentKind::List => Ok(workflow_list(&ListWorkflowResponse::decode(input)?)),
        DocumentKind::Create => {
            let dto = CreateWorkflowDto::decode(input)?;
            Ok(draft(&dto.name, Some(&dto.workflow_id), &dto.steps))
        }
        DocumentKind::Update => {
            let dto = UpdateWorkflowDto::decode(input)?;
            Ok(draft(&dto.name, dto.workflow_id.as_ref(), &dto.steps))
        }
        DocumentKind::Step => {
            let step = UpsertStep::decode(input)?;
            Ok(format!("{} ({})\n", step.name(), step.step_type()))
        }
        DocumentKind::StepResponse => {
            let step = ResponseStep::decode(input)?;
            let mut out = format!("{} ({}) stepId={}\n", step.name(), step.step_type(), step.step_id());
            if let Some(issues) = step.issues() {
                write_issues(&mut out, "  ", issues);
            }
            Ok(out)
        }
        other => Err(CliError::Arguments(format!(
            "inspect does not support {other:?} documents; use normalize"
        ))),
    }
}

fn workflow(dto: &WorkflowResponseDto) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", dto.name, dto.workflow_id);
    let _ = writeln!(out, "Status:   {} (active: {})", dto.status, dto.active);
    let _ = writeln!(out, "Origin:   {}", dto.origin);
    let _ = writeln!(
        out,
        "Created:  {}",
        format_timestamp(dto.created_at_utc(), &dto.created_at)
    );
    let _ = writeln!(
        out,
        "Updated:  {}",
        format_timestamp(dto.updated_at_utc(), &dto.updated_at)
    );
    let _ = writeln!(out, "Issues:   {}", dto.issue_count());

    if let Some(issues) = &dto.issues {
        for (field, issue) in issues {
            let _ = writeln!(out, "  {field}: {} {}", issue.issue_type, issue.message);
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{:<4} {:<8} {:<32} {:<24} {:>6}", "#", "TYPE", "NAME", "STEP ID", "ISSUES");
    let _ = writeln!(out, "{}", separator(TABLE_WIDTH));
    for (index, step) in dto.steps.iter().enumerate() {
        let issue_count = step.issues().map_or(0, StepIssues::count);
        let _ = writeln!(
            out,
            "{:<4} {:<8} {:<32} {:<24} {:>6}",
            index + 1,
            step.step_type(),
            truncate_string(step.name(), 32),
            truncate_string(step.step_id(), 24),
            issue_count
        );
        if let Some(issues) = step.issues() {
            write_issues(&mut out, "       ", issues);
        }
    }
    out
}

fn workflow_list(list: &ListWorkflowResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<28} {:<24} {:<8} {:<20} STEPS",
        "NAME", "WORKFLOW ID", "STATUS", "LAST TRIGGERED"
    );
    let _ = writeln!(out, "{}", separator(TABLE_WIDTH));
    for workflow in &list.workflows {
        let last = workflow.last_triggered_at.as_deref().map(|raw| {
            format_timestamp(workflow.last_triggered_at_utc(), raw)
        });
        let steps: Vec<&str> = workflow
            .step_type_overviews
            .iter()
            .map(|kind| kind.as_tag())
            .collect();
        let _ = writeln!(
            out,
            "{:<28} {:<24} {:<8} {:<20} {}",
            truncate_string(&workflow.name, 28),
            truncate_string(&workflow.workflow_id, 24),
            workflow.status,
            format_optional(last.as_ref(), "never"),
            steps.join(",")
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Showing {} of {} workflow(s)",
        list.workflows.len(),
        list.total_count
    );
    out
}

fn draft(name: &str, workflow_id: Option<&String>, steps: &[UpsertStep]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{name} ({})", format_optional(workflow_id, "new"));
    for (index, step) in steps.iter().enumerate() {
        let _ = writeln!(out, "  {}. [{}] {}", index + 1, step.step_type(), step.name());
    }
    if steps.is_empty() {
        let _ = writeln!(out, "  (no steps)");
    }
    out
}

fn write_issues(out: &mut String, indent: &str, issues: &StepIssues) {
    for (field, entries) in issues.controls.iter().flatten() {
        for issue in entries {
            let _ = writeln!(out, "{indent}controls.{field}: {} {}", issue.issue_type, issue.message);
        }
    }
    for (field, entries) in issues.integration.iter().flatten() {
        for issue in entries {
            let _ = writeln!(
                out,
                "{indent}integration.{field}: {} {}",
                issue.issue_type, issue.message
            );
        }
    }
}
