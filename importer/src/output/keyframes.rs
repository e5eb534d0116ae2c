use anyhow::Context;
use deshakecore::Pose;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Layout of the keyframe tuples handed to the host renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// One `frame x y rotation new_scene` line per keyframe.
    #[default]
    Text,
    /// A JSON array of keyframe objects.
    Json,
}

/// Writes keyframes in `format` to `writer`.
pub fn write_keyframes<W: Write>(
    writer: &mut W,
    poses: &[Pose],
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            for pose in poses {
                writeln!(
                    writer,
                    "{} {:.6} {:.6} {:.6} {}",
                    pose.frame_index,
                    pose.x,
                    pose.y,
                    pose.rotation_deg,
                    if pose.is_new_scene { "new_scene" } else { "-" }
                )
                .context("writing text keyframe")?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, poses)
                .context("serializing keyframes as JSON")?;
            writeln!(writer).context("terminating JSON output")?;
        }
    }
    writer.flush().context("flushing keyframes")?;
    Ok(())
}
