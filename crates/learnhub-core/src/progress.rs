use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::course::{Course, Video};

/// Videos a user has finished in one course, in the order they were marked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct WatchedVideos {
    pub watched: Vec<String>,
}

impl WatchedVideos {
    pub fn new(watched: Vec<String>) -> Self {
        Self { watched }
    }

    pub fn contains(&self, video_id: &str) -> bool {
        self.watched.iter().any(|w| w == video_id)
    }

    /// Append `video_id` unless already present. Returns whether it was added.
    pub fn mark(&mut self, video_id: &str) -> bool {
        if self.contains(video_id) {
            return false;
        }
        self.watched.push(video_id.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.watched.len()
    }

    pub fn is_empty(&self) -> bool {
        self.watched.is_empty()
    }
}

/// Where the next unwatched video sits inside a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct NextVideo {
    pub module_index: usize,
    pub video_index: usize,
    pub video: Video,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub watched: Vec<String>,
    /// Watched ids that belong to the course.
    pub watched_count: usize,
    pub total_videos: usize,
    pub percent: u8,
    pub completed: bool,
    pub next_video: Option<NextVideo>,
}

impl ProgressSummary {
    pub fn compute(user_id: Uuid, course: &Course, watched: &WatchedVideos) -> Self {
        let seen: HashSet<&str> = watched.watched.iter().map(String::as_str).collect();
        let total_videos = course.total_videos();
        let watched_count = course
            .videos()
            .filter(|v| seen.contains(v.id.as_str()))
            .count();

        let percent = if total_videos == 0 {
            0
        } else {
            ((watched_count as f64 / total_videos as f64) * 100.0).round() as u8
        };

        let next_video = course
            .modules
            .iter()
            .enumerate()
            .flat_map(|(mi, m)| m.videos.iter().enumerate().map(move |(vi, v)| (mi, vi, v)))
            .find(|(_, _, v)| !seen.contains(v.id.as_str()))
            .map(|(module_index, video_index, video)| NextVideo {
                module_index,
                video_index,
                video: video.clone(),
            });

        Self {
            user_id,
            course_id: course.id,
            watched: watched.watched.clone(),
            watched_count,
            total_videos,
            percent,
            completed: total_videos > 0 && watched_count == total_videos,
            next_video,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::fixtures::{course, module};
    use rstest::rstest;

    #[test]
    fn marking_twice_is_a_no_op() {
        let mut w = WatchedVideos::default();
        assert!(w.mark("v1"));
        assert!(!w.mark("v1"));
        assert!(w.mark("v2"));
        assert_eq!(w.watched, ["v1", "v2"]);
        assert_eq!(w.len(), 2);
    }

    #[rstest]
    #[case(&[], 0, false)]
    #[case(&["v1"], 33, false)]
    #[case(&["v1", "v2"], 67, false)]
    #[case(&["v1", "v2", "v3"], 100, true)]
    #[case(&["v1", "ghost"], 33, false)]
    fn percent_counts_only_course_videos(
        #[case] watched: &[&str],
        #[case] percent: u8,
        #[case] completed: bool,
    ) {
        let c = course("Git", vec![module("m1", &["v1", "v2"]), module("m2", &["v3"])]);
        let w = WatchedVideos::new(watched.iter().map(|s| s.to_string()).collect());
        let summary = ProgressSummary::compute(Uuid::nil(), &c, &w);
        assert_eq!(summary.percent, percent);
        assert_eq!(summary.completed, completed);
        assert_eq!(summary.total_videos, 3);
        assert_eq!(summary.watched.len(), watched.len());
    }

    #[test]
    fn next_video_follows_module_order() {
        let c = course("Git", vec![module("m1", &["v1", "v2"]), module("m2", &["v3"])]);
        let w = WatchedVideos::new(vec!["v1".into(), "v2".into()]);
        let next = ProgressSummary::compute(Uuid::nil(), &c, &w).next_video.unwrap();
        assert_eq!((next.module_index, next.video_index), (1, 0));
        assert_eq!(next.video.id, "v3");
    }

    #[test]
    fn skipped_video_comes_back_first() {
        let c = course("Git", vec![module("m1", &["v1", "v2"])]);
        let w = WatchedVideos::new(vec!["v2".into()]);
        let next = ProgressSummary::compute(Uuid::nil(), &c, &w).next_video.unwrap();
        assert_eq!(next.video.id, "v1");
    }

    #[test]
    fn empty_course_is_never_completed() {
        let c = course("Empty", vec![module("m1", &[])]);
        let summary = ProgressSummary::compute(Uuid::nil(), &c, &WatchedVideos::default());
        assert_eq!(summary.percent, 0);
        assert!(!summary.completed);
        assert!(summary.next_video.is_none());
    }
}
