use crate::photo::{Orientation, Photo, PhotoId};

/// Photos in ingestion order, unique by id.
///
/// The position of a photo is its sequence index; placement plans are
/// index-aligned with it. Only append, remove-by-id and clear mutate it.
#[derive(Debug, Clone, Default)]
pub struct PhotoCollection {
    photos: Vec<Photo>,
}

impl PhotoCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `photo`, returning `false` if its id is already present
    pub fn append(&mut self, photo: Photo) -> bool {
        if self.contains(photo.id()) {
            return false;
        }
        self.photos.push(photo);
        true
    }

    pub fn remove(&mut self, id: PhotoId) -> Option<Photo> {
        let index = self.sequence_index(id)?;
        Some(self.photos.remove(index))
    }

    pub fn clear(&mut self) {
        self.photos.clear();
    }

    pub fn contains(&self, id: PhotoId) -> bool {
        self.photos.iter().any(|p| p.id() == id)
    }

    pub fn get(&self, id: PhotoId) -> Option<&Photo> {
        self.photos.iter().find(|p| p.id() == id)
    }

    pub fn sequence_index(&self, id: PhotoId) -> Option<usize> {
        self.photos.iter().position(|p| p.id() == id)
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Photo> {
        self.photos.iter()
    }

    pub fn as_slice(&self) -> &[Photo] {
        &self.photos
    }

    pub fn ids(&self) -> Vec<PhotoId> {
        self.photos.iter().map(Photo::id).collect()
    }

    pub fn orientations(&self) -> Vec<Orientation> {
        self.photos.iter().map(Photo::orientation).collect()
    }
}
