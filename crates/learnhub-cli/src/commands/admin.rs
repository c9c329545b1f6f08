//! Commands that talk to a running server through [`LearnhubClient`].

use anyhow::{Context, Result};
use colored::Colorize;
use learnhub_client::LearnhubClient;
use learnhub_core::{
    AccessRequest, Course, CourseFilter, CourseStatus, DashboardStats, ProgressSummary,
    StudentCourse, User, UserStatus,
};
use uuid::Uuid;

fn status_label(status: CourseStatus) -> colored::ColoredString {
    match status {
        CourseStatus::Active => status.as_str().bright_green(),
        CourseStatus::Draft => status.as_str().bright_black(),
        CourseStatus::Pending => status.as_str().bright_yellow(),
    }
}

pub async fn cmd_courses(client: &LearnhubClient, filter: CourseFilter) -> Result<Vec<Course>> {
    let courses = client.courses(&filter).await.context("fetch courses")?;
    println!(
        "{} {}",
        "Courses:".bright_cyan().bold(),
        courses.len().to_string().bright_yellow()
    );
    for course in &courses {
        println!(
            "  {} {} [{}] {} {}, {} {}",
            "-".bright_white(),
            course.title.bright_green(),
            status_label(course.status),
            course.total_videos().to_string().bright_blue(),
            "videos".bright_white(),
            course.enrolled_students.to_string().bright_blue(),
            "enrolled".bright_white()
        );
        println!("    {} {}", "id:".bright_black(), course.id);
    }
    Ok(courses)
}

pub async fn cmd_users(client: &LearnhubClient) -> Result<Vec<User>> {
    let users = client.users().await.context("fetch users")?;
    println!(
        "{} {}",
        "Users:".bright_cyan().bold(),
        users.len().to_string().bright_yellow()
    );
    for user in &users {
        let status = match user.status {
            UserStatus::Active => user.status.as_str().bright_green(),
            UserStatus::Inactive => user.status.as_str().bright_black(),
        };
        println!(
            "  {} {} <{}> {} [{}]",
            "-".bright_white(),
            user.name.bright_green(),
            user.email,
            user.role.as_str().bright_magenta(),
            status
        );
        println!("    {} {}", "id:".bright_black(), user.id);
    }
    Ok(users)
}

pub async fn cmd_requests(
    client: &LearnhubClient,
    student: Option<Uuid>,
) -> Result<Vec<AccessRequest>> {
    let requests = client.requests(student).await.context("fetch requests")?;
    println!(
        "{} {}",
        "Pending requests:".bright_cyan().bold(),
        requests.len().to_string().bright_yellow()
    );
    for request in &requests {
        println!(
            "  {} {} {} {} {}",
            "-".bright_white(),
            "student".cyan(),
            request.student_id,
            "course".cyan(),
            request.course_id
        );
        println!(
            "    {} {}",
            "requested:".bright_black(),
            request.created_at.to_rfc3339()
        );
    }
    Ok(requests)
}

pub async fn cmd_enroll(client: &LearnhubClient, pair: StudentCourse) -> Result<()> {
    client
        .enroll(pair)
        .await
        .with_context(|| format!("enroll {pair}"))?;
    println!("{} {}", "Enrolled".bright_green(), pair);
    Ok(())
}

pub async fn cmd_unenroll(client: &LearnhubClient, pair: StudentCourse) -> Result<()> {
    client
        .unenroll(pair)
        .await
        .with_context(|| format!("unenroll {pair}"))?;
    println!("{} {}", "Unenrolled".bright_yellow(), pair);
    Ok(())
}

pub async fn cmd_approve(client: &LearnhubClient, pair: StudentCourse) -> Result<()> {
    client
        .approve_request(pair)
        .await
        .with_context(|| format!("approve request {pair}"))?;
    println!("{} {}", "Approved".bright_green(), pair);
    Ok(())
}

pub async fn cmd_progress(
    client: &LearnhubClient,
    user: Uuid,
    course: Uuid,
) -> Result<ProgressSummary> {
    let summary = client
        .progress_summary(user, course)
        .await
        .context("fetch progress")?;
    println!(
        "{} {}/{} {} ({}%)",
        "Progress:".bright_cyan().bold(),
        summary.watched_count.to_string().bright_yellow(),
        summary.total_videos.to_string().bright_yellow(),
        "videos".bright_white(),
        summary.percent
    );
    if summary.completed {
        println!("  {}", "Course completed.".bright_green());
    } else if let Some(next) = &summary.next_video {
        println!(
            "  {} {} (module {}, video {})",
            "Next:".cyan(),
            next.video.title.bright_white(),
            next.module_index + 1,
            next.video_index + 1
        );
    }
    Ok(summary)
}

pub(crate) fn print_stats(stats: &DashboardStats) {
    let rows = [
        ("Students:", stats.total_students),
        ("Active students:", stats.active_students),
        ("Courses:", stats.total_courses),
        ("Active courses:", stats.active_courses),
        ("Enrollments:", stats.total_enrollments),
        ("Pending requests:", stats.pending_requests),
    ];
    for (label, value) in rows {
        println!("  {} {}", label.cyan(), value.to_string().bright_yellow());
    }
}

pub async fn cmd_stats(client: &LearnhubClient) -> Result<DashboardStats> {
    let stats = client.stats().await.context("fetch stats")?;
    println!("{}", "Dashboard:".bright_cyan().bold());
    print_stats(&stats);
    Ok(stats)
}
