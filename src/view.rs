use crate::error::RenderError;
use crate::signaling::RoomEntry;
use serde_json::Value;
use std::fmt;
use tracing::warn;

/// A room as shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: String,
    pub port: u16,
    pub participants: usize,
}

impl Room {
    /// Validates one `/rooms` entry; `index` is its position in the response
    pub fn from_entry(index: usize, entry: &RoomEntry) -> Result<Self, RenderError> {
        let id = match &entry.id {
            Some(Value::String(id)) => id.clone(),
            Some(other) => return Err(invalid(index, "id", other)),
            None => return Err(RenderError::MissingField { index, field: "id" }),
        };

        let port = match &entry.port {
            Some(v) => v
                .as_u64()
                .and_then(|p| u16::try_from(p).ok())
                .ok_or_else(|| invalid(index, "port", v))?,
            None => return Err(RenderError::MissingField { index, field: "port" }),
        };

        let participants = match &entry.participants {
            Some(Value::Array(list)) => list.len(),
            Some(other) => return Err(invalid(index, "participants", other)),
            None => {
                return Err(RenderError::MissingField {
                    index,
                    field: "participants",
                })
            }
        };

        Ok(Self {
            id,
            port,
            participants,
        })
    }
}

fn invalid(index: usize, field: &'static str, found: &Value) -> RenderError {
    RenderError::InvalidField {
        index,
        field,
        found: found.to_string(),
    }
}

/// Latest room snapshot, ascending by port. Rebuilt whole on every refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomListView {
    rooms: Vec<Room>,
    switch_enabled: bool,
}

impl RoomListView {
    /// Malformed entries are logged and left out, the rest still render.
    /// `switch_enabled` says whether a session existed when the list was built.
    pub fn build(entries: &[RoomEntry], switch_enabled: bool) -> Self {
        let mut rooms: Vec<Room> = entries
            .iter()
            .enumerate()
            .filter_map(|(i, entry)| match Room::from_entry(i, entry) {
                Ok(room) => Some(room),
                Err(e) => {
                    warn!("skipping room: {}", e);
                    None
                }
            })
            .collect();

        // stable: equal ports keep server order
        rooms.sort_by_key(|r| r.port);

        Self {
            rooms,
            switch_enabled,
        }
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn switch_enabled(&self) -> bool {
        self.switch_enabled
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// 1-based position as printed
    pub fn room_at(&self, position: usize) -> Option<&Room> {
        position.checked_sub(1).and_then(|i| self.rooms.get(i))
    }
}

impl fmt::Display for RoomListView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rooms.is_empty() {
            return writeln!(f, "(no rooms)");
        }
        for (i, room) in self.rooms.iter().enumerate() {
            writeln!(f, "{}. ID: {}", i + 1, room.id)?;
            writeln!(f, "   Port: {}", room.port)?;
            write!(f, "   Participants: {}", room.participants)?;
            if self.switch_enabled {
                write!(f, "  [switch]")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
