//! Scene start and end handlers.

use log::debug;

use crate::{
    commands::{
        CommandResult,
        markdown_response::{format_counter_change, format_scene_ended, format_scene_started},
    },
    tracker::{SceneEnd, Tracker},
};

/// Starts a scene, ending the active one first.
///
/// The responses of the implicit end come before the start announcement.
pub async fn handle_scene_start(
    tracker: &mut Tracker,
    name: &str,
) -> Result<CommandResult, anyhow::Error> {
    debug!("handling scene start {}", name);

    let start = tracker.start_scene(name).await?;

    let mut responses = match &start.previous {
        Some(end) => scene_end_responses(end),
        None => Vec::new(),
    };
    responses.push(format_scene_started(&start.name));

    Ok(CommandResult::with_responses(responses))
}

/// Ends the active scene, spending one momentum even without a scene.
pub async fn handle_scene_end(tracker: &mut Tracker) -> Result<CommandResult, anyhow::Error> {
    debug!("handling scene end");

    let end = tracker.end_scene().await?;

    Ok(CommandResult::with_responses(scene_end_responses(&end)))
}

fn scene_end_responses(end: &SceneEnd) -> Vec<String> {
    let mut responses = Vec::new();
    if let Some(name) = &end.ended {
        responses.push(format_scene_ended(name));
    }
    responses.push(format_counter_change(&end.momentum));
    responses
}
