//! Board definitions as described by the world, and their validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    collab::{CameraPose, TokenPlacement},
    game::{BoardId, Position, Team},
};

/// Reasons a board definition is unusable. Only that board is skipped.
#[derive(Debug, Error, PartialEq)]
pub enum DefinitionError {
    #[error("board definition has an empty id")]
    MissingId,

    #[error("board '{board}' is missing its {element}")]
    MissingElement { board: BoardId, element: &'static str },

    #[error("board '{board}' has {columns} column(s), need at least {required}")]
    TooFewColumns {
        board: BoardId,
        columns: usize,
        required: usize,
    },

    #[error("duplicate board id '{0}'")]
    DuplicateId(BoardId),

    #[error("failed to parse board definitions: {0}")]
    Parse(String),
}

/// Interaction holder exposing the join/leave trigger.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct InteractionHolder {
    pub join_trigger: String,
}

/// One droppable column and the point tokens fall from.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
pub struct ColumnTrigger {
    pub position: Position,
}

/// Raw definition as loaded from disk. Required parts are optional here so a
/// malformed board can be reported instead of failing the whole document.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct BoardDefinition {
    #[serde(default)]
    pub id: BoardId,
    /// World position used for distance checks.
    #[serde(default)]
    pub origin: Position,
    pub token_container: Option<String>,
    pub base_height: Option<f32>,
    pub interaction: Option<InteractionHolder>,
    #[serde(default)]
    pub columns: Vec<ColumnTrigger>,
    pub camera_pose: Option<CameraPose>,
}

/// A definition with every required part present.
#[derive(Clone, Debug, PartialEq)]
pub struct BoardLayout {
    pub id: BoardId,
    pub origin: Position,
    pub token_container: String,
    pub base_height: f32,
    pub join_trigger: String,
    pub columns: Vec<ColumnTrigger>,
    pub camera_pose: CameraPose,
}

impl BoardDefinition {
    /// Checks required parts. `min_columns` is the win length.
    pub fn validate(self, min_columns: usize) -> Result<BoardLayout, DefinitionError> {
        if self.id.trim().is_empty() {
            return Err(DefinitionError::MissingId);
        }
        let board = self.id;
        let missing = |element| DefinitionError::MissingElement {
            board: board.clone(),
            element,
        };

        let token_container = self.token_container.ok_or_else(|| missing("token container"))?;
        let base_height = self.base_height.ok_or_else(|| missing("base height"))?;
        let interaction = self.interaction.ok_or_else(|| missing("interaction holder"))?;
        let camera_pose = self.camera_pose.ok_or_else(|| missing("camera pose"))?;

        if self.columns.is_empty() {
            return Err(missing("column triggers"));
        }
        if self.columns.len() < min_columns {
            return Err(DefinitionError::TooFewColumns {
                board,
                columns: self.columns.len(),
                required: min_columns,
            });
        }

        Ok(BoardLayout {
            id: board,
            origin: self.origin,
            token_container,
            base_height,
            join_trigger: interaction.join_trigger,
            columns: self.columns,
            camera_pose,
        })
    }
}

impl BoardLayout {
    /// Placement handed to the visual collaborator for a token at `(column, row)`.
    pub fn placement(&self, column: usize, row: usize, team: Team, row_height: f32) -> TokenPlacement {
        let drop_from = self.columns[column - 1].position;
        TokenPlacement {
            column,
            row,
            team,
            drop_from,
            landing: Position::new(
                drop_from.x,
                self.base_height + row as f32 * row_height,
                drop_from.z,
            ),
        }
    }
}

/// Parses a JSON array of board definitions.
pub fn parse_definitions(json: &str) -> Result<Vec<BoardDefinition>, DefinitionError> {
    serde_json::from_str(json).map_err(|e| DefinitionError::Parse(e.to_string()))
}
