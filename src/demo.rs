// Demo mode: generate a scripted session to showcase the client
//
// With no server protocol in scope, the feed is either this script or a
// replayed transcript. The script exercises everything the renderer
// understands: styled spans crossing line boundaries, rgb-triple and
// 256-indexed colors, unknown elements, blank separator rows, and echoed
// input.

use crate::events::SessionEvent;
use crate::text::TagNode;
use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::sleep;

/// Run the scripted demo session until shutdown.
pub async fn run_demo(tx: mpsc::Sender<SessionEvent>, mut shutdown_rx: oneshot::Receiver<()>) {
    // Initial delay to let the TUI render an empty frame first.
    sleep(Duration::from_millis(400)).await;

    for (event, delay_ms) in demo_script() {
        if shutdown_rx.try_recv().is_ok() {
            return;
        }
        if tx.send(event).await.is_err() {
            return;
        }
        sleep(Duration::from_millis(delay_ms)).await;
    }

    // Idle heartbeat so the view keeps receiving output.
    let mut beat = 0u32;
    loop {
        tokio::select! {
            _ = &mut shutdown_rx => {
                tracing::info!("demo received shutdown signal");
                return;
            }
            _ = sleep(Duration::from_secs(20)) => {
                beat += 1;
                let chime = TagNode::Group(vec![
                    TagNode::element(
                        "color",
                        [("foreground", "yellow")],
                        vec![TagNode::text("The clock tower chimes in the distance.")],
                    ),
                    TagNode::text("\n"),
                ]);
                tracing::debug!("demo heartbeat {beat}");
                if tx.send(SessionEvent::Display(chime)).await.is_err() {
                    return;
                }
            }
        }
    }
}

/// Replay a recorded transcript: one JSON session event per line.
pub async fn run_replay(
    path: &Path,
    tx: mpsc::Sender<SessionEvent>,
    mut shutdown_rx: oneshot::Receiver<()>,
) -> Result<()> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read transcript {}", path.display()))?;

    sleep(Duration::from_millis(400)).await;

    for (number, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        if shutdown_rx.try_recv().is_ok() {
            return Ok(());
        }

        let event: SessionEvent = serde_json::from_str(line)
            .with_context(|| format!("malformed event on line {}", number + 1))?;
        if tx.send(event).await.is_err() {
            return Ok(());
        }
        sleep(Duration::from_millis(80)).await;
    }

    tracing::info!("transcript finished, waiting for shutdown");
    let _ = shutdown_rx.await;
    Ok(())
}

fn color(fg: &str, text: &str) -> TagNode {
    TagNode::element("color", [("foreground", fg)], vec![TagNode::text(text)])
}

/// The scripted session: (event, delay after sending it).
fn demo_script() -> Vec<(SessionEvent, u64)> {
    let banner = TagNode::element(
        "color",
        [("foreground", "cyan")],
        vec![TagNode::text(
            "+------------------------------+\n\
             |       D E E R H O L T        |\n\
             |  a quiet place by the river  |\n\
             +------------------------------+\n",
        )],
    );

    let room = TagNode::Group(vec![
        TagNode::element(
            "color",
            [("foreground", "white"), ("background", "black")],
            vec![TagNode::text("Village Square")],
        ),
        TagNode::text("\n"),
        TagNode::text(
            "A worn cobblestone square ringed by timbered houses. A fountain\n\
             murmurs at its center, and lantern light spills from the inn.\n",
        ),
        color("green", "Exits: north, east, inn"),
        TagNode::text("\n"),
    ]);

    let chatter = TagNode::Group(vec![
        TagNode::element(
            "channel",
            [("name", "gossip")],
            vec![
                color("magenta", "[gossip] "),
                color("yellow", "Niamh"),
                TagNode::text(": anyone seen the ferryman tonight?\n"),
            ],
        ),
    ]);

    let ember = TagNode::Group(vec![
        TagNode::text("The blacksmith stokes the forge and "),
        color("256:208", "embers swirl upward,\nscattering"),
        TagNode::text(" into the dark.\n"),
    ]);

    let storm = TagNode::Group(vec![
        color("120,140,255", "Lightning splits the sky!\nThunder follows"),
        TagNode::text(", rattling every shutter on the square.\n"),
    ]);

    vec![
        (SessionEvent::Connected, 300),
        (SessionEvent::Display(banner), 700),
        (
            SessionEvent::display_text("Welcome back, traveler.\n\n"),
            600,
        ),
        (SessionEvent::Display(room), 1200),
        (SessionEvent::Echo("look fountain".to_string()), 500),
        (
            SessionEvent::display_text(
                "Coins glint at the bottom of the fountain. Make a wish?\n",
            ),
            1000,
        ),
        (SessionEvent::Display(chatter), 1100),
        (SessionEvent::Display(ember), 1000),
        (SessionEvent::Echo("say the night is quiet".to_string()), 500),
        (
            SessionEvent::Display(TagNode::Group(vec![
                TagNode::text("You say, \""),
                color("cyan", "the night is quiet"),
                TagNode::text("\"\n"),
            ])),
            900,
        ),
        (SessionEvent::Display(storm), 1000),
        (SessionEvent::display_text("\n"), 400),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::split_into_lines;
    use std::io::Write;

    #[tokio::test]
    async fn replay_streams_transcript_events_in_order() {
        let mut transcript = tempfile::NamedTempFile::new().unwrap();
        writeln!(transcript, r#"{{"topic": "system/connected"}}"#).unwrap();
        writeln!(
            transcript,
            r#"{{"topic": "system/display", "data": "A door creaks open.\n"}}"#
        )
        .unwrap();
        transcript.flush().unwrap();

        let (tx, mut rx) = mpsc::channel(16);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let path = transcript.path().to_path_buf();
        let replay = tokio::spawn(async move { run_replay(&path, tx, shutdown_rx).await });

        assert_eq!(rx.recv().await, Some(SessionEvent::Connected));
        assert_eq!(
            rx.recv().await,
            Some(SessionEvent::display_text("A door creaks open.\n"))
        );

        let _ = shutdown_tx.send(());
        replay.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn replay_rejects_malformed_transcript() {
        let mut transcript = tempfile::NamedTempFile::new().unwrap();
        writeln!(transcript, "not json at all").unwrap();
        transcript.flush().unwrap();

        let (tx, _rx) = mpsc::channel(16);
        let (_shutdown_tx, shutdown_rx) = oneshot::channel();
        let err = run_replay(transcript.path(), tx, shutdown_rx)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn script_chunks_split_cleanly() {
        // Every display chunk in the script must survive the splitter with
        // its text intact.
        for (event, _) in demo_script() {
            let SessionEvent::Display(chunk) = event else {
                continue;
            };
            let mut original = String::new();
            chunk.text_content(&mut original);

            let lines = split_into_lines(vec![chunk]);
            let rejoined: Vec<String> = lines.iter().map(|l| l.text()).collect();
            assert_eq!(rejoined.join("\n"), original);
        }
    }
}
