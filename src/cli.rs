use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::{Value, json};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::debug;

use rust_eduportal_core::client::{ApiClient, FileStore, workflow};
use rust_eduportal_core::config::AppConfig;
use rust_eduportal_core::errors::{PortalError, Result};
use rust_eduportal_core::models::{ActivityType, GradeTab, SubmissionPayload, TabFilter};
use rust_eduportal_core::services::{eligibility, grading};

#[derive(Parser, Debug)]
#[command(
    name = "eduportal",
    about = "Work with course activities, submissions and grades from the command line",
    version
)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List a student's activities grouped by tab
    Activities(ActivitiesArgs),
    /// Show a student's grade book and summary
    Grades(GradesArgs),
    /// Submit work for an activity
    Submit(SubmitArgs),
    /// Grade a submission
    Grade(GradeArgs),
    /// Return a submission to the student
    Return(ReturnArgs),
    /// Submission statistics for one activity
    Stats(StatsArgs),
    /// Pending grading across a course
    Workload(WorkloadArgs),
}

#[derive(Args, Debug)]
struct ActivitiesArgs {
    #[arg(long)]
    student: i64,
    #[arg(long, default_value = "all")]
    tab: TabFilter,
    /// Only show one activity type (e.g. QUIZ)
    #[arg(long = "type")]
    activity_type: Option<ActivityType>,
}

#[derive(Args, Debug)]
struct GradesArgs {
    #[arg(long)]
    student: i64,
    #[arg(long, default_value = "all")]
    tab: GradeTab,
}

#[derive(Args, Debug)]
struct SubmitArgs {
    #[arg(long)]
    activity: i64,
    #[arg(long)]
    student: i64,
    #[arg(long)]
    text: Option<String>,
    /// Local file to upload and attach, may be repeated
    #[arg(long = "file")]
    files: Vec<PathBuf>,
    #[arg(long)]
    url: Option<String>,
    /// Answer in the form QUESTION=ANSWER, may be repeated
    #[arg(long = "answer")]
    answers: Vec<String>,
}

#[derive(Args, Debug)]
struct GradeArgs {
    #[arg(long)]
    submission: i64,
    #[arg(long)]
    score: f64,
    #[arg(long)]
    feedback: Option<String>,
}

#[derive(Args, Debug)]
struct ReturnArgs {
    #[arg(long)]
    submission: i64,
    #[arg(long)]
    reason: String,
}

#[derive(Args, Debug)]
struct StatsArgs {
    #[arg(long)]
    activity: i64,
    /// Number of top scores to list
    #[arg(long, default_value_t = 5)]
    top: usize,
}

#[derive(Args, Debug)]
struct WorkloadArgs {
    #[arg(long)]
    course: i64,
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_answers(raw: &[String]) -> Result<Vec<(String, Value)>> {
    raw.iter()
        .map(|item| {
            item.split_once('=')
                .map(|(q, a)| (q.trim().to_string(), Value::String(a.trim().to_string())))
                .ok_or_else(|| {
                    PortalError::validation(format!("answer '{item}' must look like QUESTION=ANSWER"))
                })
        })
        .collect()
}

async fn activities(client: &ApiClient, args: ActivitiesArgs) -> Result<()> {
    let now = Utc::now();
    let mut entries = client.student_activities(args.student).await?;
    entries.retain(|e| eligibility::is_visible(&e.activity, now));
    eligibility::sort_by_due_date(&mut entries);

    let counts = eligibility::tab_counts(&entries, now);
    let listed: Vec<Value> = eligibility::filter_activities(&entries, args.tab, args.activity_type, now)
        .into_iter()
        .map(|entry| {
            json!({
                "activity": entry,
                "tab": eligibility::classify(&entry.activity, entry.submission.as_ref(), now),
                "tone": eligibility::status_tone(entry, now),
            })
        })
        .collect();

    print_json(&json!({ "counts": counts, "activities": listed }))
}

async fn grades(client: &ApiClient, args: GradesArgs) -> Result<()> {
    let mut activities: Vec<_> = client
        .student_activities(args.student)
        .await?
        .into_iter()
        .map(|entry| entry.activity)
        .collect();
    let submissions = client.student_submissions(args.student).await?;

    // 已下架或已过开放期的活动不在学生列表里，单独补取
    let known: HashSet<i64> = activities.iter().map(|a| a.id).collect();
    let missing: HashSet<i64> = submissions
        .iter()
        .map(|s| s.activity_id)
        .filter(|id| !known.contains(id))
        .collect();
    for activity_id in missing {
        if let Some(activity) = client.get_activity(activity_id).await? {
            activities.push(activity);
        }
    }

    let summary = grading::summarize_submissions(&activities, &submissions)?;
    let rows = grading::grade_book(&activities, &submissions);
    let rows = grading::filter_grade_rows(&rows, args.tab);
    print_json(&json!({ "summary": summary, "rows": rows }))
}

async fn submit(client: &ApiClient, args: SubmitArgs) -> Result<()> {
    let now = Utc::now();
    let activity = client
        .get_activity(args.activity)
        .await?
        .ok_or_else(|| PortalError::not_found(format!("activity {}", args.activity)))?;
    let existing = client
        .student_activity_submissions(activity.id, args.student)
        .await?;
    // 上传文件之前先确认还能提交
    eligibility::check_eligibility(&activity, &existing, now)?;

    let mut file_urls = Vec::new();
    for path in &args.files {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| PortalError::validation(format!("invalid file path {}", path.display())))?;
        let bytes = std::fs::read(path)?;
        debug!("Uploading {} ({} bytes)", file_name, bytes.len());
        file_urls.push(client.upload(file_name, bytes).await?.file_path);
    }

    let payload = SubmissionPayload {
        text: args.text,
        file_urls,
        attachment_url: args.url,
        answers: parse_answers(&args.answers)?.into_iter().collect(),
    };
    let result =
        workflow::submit_and_refresh(client, &activity, args.student, &existing, payload, now)
            .await?;
    print_json(&json!({ "created": result.updated, "submissions": result.submissions }))
}

async fn grade(client: &ApiClient, args: GradeArgs) -> Result<()> {
    let submission = client
        .get_submission(args.submission)
        .await?
        .ok_or_else(|| PortalError::not_found(format!("submission {}", args.submission)))?;
    let activity = client
        .get_activity(submission.activity_id)
        .await?
        .ok_or_else(|| {
            PortalError::data_integrity(format!(
                "activity {} of submission {} not found",
                submission.activity_id, args.submission
            ))
        })?;

    let result = workflow::grade_and_refresh(
        client,
        &activity,
        &submission,
        args.score,
        args.feedback,
        Utc::now(),
    )
    .await?;
    print_json(&json!({ "graded": result.updated, "submissions": result.submissions }))
}

async fn return_submission(client: &ApiClient, args: ReturnArgs) -> Result<()> {
    let submission = client
        .get_submission(args.submission)
        .await?
        .ok_or_else(|| PortalError::not_found(format!("submission {}", args.submission)))?;
    let result = workflow::return_and_refresh(client, &submission, &args.reason, Utc::now()).await?;
    print_json(&json!({ "returned": result.updated, "submissions": result.submissions }))
}

async fn stats(client: &ApiClient, args: StatsArgs) -> Result<()> {
    let activity = client
        .get_activity(args.activity)
        .await?
        .ok_or_else(|| PortalError::not_found(format!("activity {}", args.activity)))?;
    let submissions = client.activity_submissions(activity.id).await?;

    let stats = grading::activity_stats(&activity, &submissions);
    let top = grading::top_performers(&submissions, args.top);
    print_json(&json!({ "stats": stats, "topPerformers": top }))
}

async fn workload(client: &ApiClient, args: WorkloadArgs) -> Result<()> {
    let activities = client.course_activities(args.course).await?;
    let mut submissions = Vec::new();
    for activity in &activities {
        submissions.extend(client.activity_submissions(activity.id).await?);
    }
    print_json(&grading::grading_workload(&activities, &submissions, Utc::now()))
}

pub(crate) async fn run(cli: Cli, config: &AppConfig) -> Result<()> {
    let client = ApiClient::from_config(config)?;
    if !client.auth().is_authenticated() {
        tracing::warn!("No API token configured, requests are sent anonymously");
    }

    match cli.command {
        Command::Activities(args) => activities(&client, args).await,
        Command::Grades(args) => grades(&client, args).await,
        Command::Submit(args) => submit(&client, args).await,
        Command::Grade(args) => grade(&client, args).await,
        Command::Return(args) => return_submission(&client, args).await,
        Command::Stats(args) => stats(&client, args).await,
        Command::Workload(args) => workload(&client, args).await,
    }
}
