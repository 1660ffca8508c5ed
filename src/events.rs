use crate::json::LevelData;
use crate::model::{GroupId, MoveOutcome, Point, VertexId};
use crate::{Level, LevelError};
use tracing::debug;

/// Input the engine accepts from the outside, one at a time.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    LevelStart(LevelData),
    LevelStop,
    /// Absolute placement reported by the input layer.
    VertexMoved { vertex: VertexId, position: Point },
    /// Relative drag, clamped to the playfield.
    VertexDragged { vertex: VertexId, delta: Point },
    /// A closed freehand loop; encloses vertices into a new group.
    PolygonClosed(Vec<Point>),
    GroupMoved { group: GroupId, delta: Point },
    Ungroup(GroupId),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Response {
    Started,
    Stopped,
    Moved(MoveOutcome),
    Grouped(Option<GroupId>),
    Ungrouped(bool),
}

impl Level {
    /// Apply one event to completion before the next is accepted.
    pub fn handle(&mut self, event: Event) -> Result<Response, LevelError> {
        let result = self.dispatch(event);
        if let Err(e) = &result {
            debug!(code = e.code(), error = %e, "event rejected");
        }
        result
    }

    fn dispatch(&mut self, event: Event) -> Result<Response, LevelError> {
        match event {
            Event::LevelStart(data) => {
                self.start(&data)?;
                Ok(Response::Started)
            }
            Event::LevelStop => {
                self.stop();
                Ok(Response::Stopped)
            }
            Event::VertexMoved { vertex, position } => {
                self.move_vertex(vertex, position).map(Response::Moved)
            }
            Event::VertexDragged { vertex, delta } => {
                self.drag_vertex(vertex, delta).map(Response::Moved)
            }
            Event::PolygonClosed(polygon) => self.group_vertices(&polygon).map(Response::Grouped),
            Event::GroupMoved { group, delta } => self.move_group(group, delta).map(Response::Moved),
            Event::Ungroup(group) => Ok(Response::Ungrouped(self.ungroup(group))),
        }
    }
}
