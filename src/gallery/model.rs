use serde::{Deserialize, Serialize};

/// A picture of the remote gallery.
///
/// `id` is the picture's position in the last received snapshot, not an
/// identifier issued by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Picture {
    pub id: usize,
    pub name: String,
    pub tags: Vec<String>,
    pub file: String,
}

impl Picture {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Body of a create call: a picture without identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PictureData {
    pub name: String,
    pub tags: Vec<String>,
    pub file: String,
}

impl From<Picture> for PictureData {
    fn from(picture: Picture) -> Self {
        Self {
            name: picture.name,
            tags: picture.tags,
            file: picture.file,
        }
    }
}

/// Wire form of a picture. Any `id` sent by the server is ignored.
#[derive(Debug, Deserialize)]
struct WirePicture {
    name: String,
    #[serde(default)]
    tags: Vec<String>,
    file: String,
}

/// Wire form of every gallery response. Fields other than `pictures` are
/// accepted and dropped.
#[derive(Debug, Deserialize)]
pub(crate) struct WireSnapshot {
    pictures: Vec<WirePicture>,
}

/// The full picture list returned by a list or mutate call, with ids
/// re-assigned by position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub pictures: Vec<Picture>,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.pictures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pictures.is_empty()
    }

    /// Build a snapshot from pictures in server order, overwriting ids.
    pub fn from_ordered(pictures: Vec<Picture>) -> Self {
        let pictures = pictures
            .into_iter()
            .enumerate()
            .map(|(id, picture)| Picture { id, ..picture })
            .collect();
        Self { pictures }
    }
}

impl From<WireSnapshot> for Snapshot {
    fn from(wire: WireSnapshot) -> Self {
        let pictures = wire
            .pictures
            .into_iter()
            .enumerate()
            .map(|(id, p)| Picture {
                id,
                name: p.name,
                tags: p.tags,
                file: p.file,
            })
            .collect();
        Self { pictures }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_ids_are_replaced_by_position() {
        let wire: WireSnapshot = serde_json::from_str(
            r#"{
                "version": 3,
                "pictures": [
                    {"id": 17, "name": "Sunset", "tags": ["sky"], "file": "a.png"},
                    {"id": "x", "name": "Harbor", "tags": [], "file": "b.jpg"},
                    {"name": "Forest", "file": "c.gif"}
                ]
            }"#,
        )
        .unwrap();

        let snapshot = Snapshot::from(wire);
        let ids: Vec<usize> = snapshot.pictures.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(snapshot.pictures[1].name, "Harbor");
        assert!(snapshot.pictures[2].tags.is_empty());
    }

    #[test]
    fn test_create_body_has_no_id() {
        let data = PictureData::from(Picture {
            id: 4,
            name: "Sunset".to_string(),
            tags: vec!["sky".to_string()],
            file: "a.png".to_string(),
        });
        let json = serde_json::to_value(&data).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["name"], "Sunset");
    }

    #[test]
    fn test_from_ordered_reassigns_ids() {
        let pictures = vec![
            Picture {
                id: 9,
                name: "A".to_string(),
                tags: vec![],
                file: "a.png".to_string(),
            },
            Picture {
                id: 3,
                name: "B".to_string(),
                tags: vec![],
                file: "b.png".to_string(),
            },
        ];
        let snapshot = Snapshot::from_ordered(pictures);
        assert_eq!(snapshot.pictures[0].id, 0);
        assert_eq!(snapshot.pictures[1].id, 1);
    }
}
