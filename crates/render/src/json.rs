use crate::error::Result;
use eventmap_model::Project;
use std::io::Write;

/// Serialize a project as a JSON document mirroring its structure
pub fn render_json(project: &Project, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(project)?
    } else {
        serde_json::to_string(project)?
    };
    Ok(json)
}

/// Stream the JSON document into a writer
pub fn write_json<W: Write>(writer: W, project: &Project, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(writer, project)?;
    } else {
        serde_json::to_writer(writer, project)?;
    }
    Ok(())
}
