// File: ./src/model/contacts.rs
// Editable list of contact rows shown on the last form step.
use crate::model::card::Contact;
use uuid::Uuid;

/// The list never shrinks below this many rows.
pub const MIN_CONTACTS: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Name,
    Phone,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactEntry {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
}

impl ContactEntry {
    fn blank() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: String::new(),
            phone: String::new(),
        }
    }

    pub fn is_filled(&self) -> bool {
        !self.name.trim().is_empty() && !self.phone.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactList {
    entries: Vec<ContactEntry>,
}

impl Default for ContactList {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactList {
    /// Starts with a single blank row.
    pub fn new() -> Self {
        Self {
            entries: vec![ContactEntry::blank()],
        }
    }

    /// Seed the editor from a saved card.
    pub fn from_contacts(contacts: &[Contact]) -> Self {
        let mut entries: Vec<ContactEntry> = contacts
            .iter()
            .map(|c| ContactEntry {
                id: Uuid::new_v4(),
                name: c.name.clone(),
                phone: c.phone.clone(),
            })
            .collect();
        if entries.is_empty() {
            entries.push(ContactEntry::blank());
        }
        Self { entries }
    }

    /// Append a blank row and return its id.
    pub fn add(&mut self) -> Uuid {
        let entry = ContactEntry::blank();
        let id = entry.id;
        self.entries.push(entry);
        id
    }

    /// Remove a row. Refused (returns false) when it is the last one left
    /// or the id is unknown.
    pub fn remove(&mut self, id: Uuid) -> bool {
        if self.entries.len() <= MIN_CONTACTS {
            return false;
        }
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        before != self.entries.len()
    }

    pub fn update(&mut self, id: Uuid, field: ContactField, value: impl Into<String>) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) else {
            return false;
        };
        match field {
            ContactField::Name => entry.name = value.into(),
            ContactField::Phone => entry.phone = value.into(),
        }
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_remove(&self) -> bool {
        self.entries.len() > MIN_CONTACTS
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContactEntry> {
        self.entries.iter()
    }

    /// Rows with both a name and a phone, in order. Half-filled rows are
    /// dropped on submission.
    pub fn filled(&self) -> Vec<Contact> {
        self.entries
            .iter()
            .filter(|e| e.is_filled())
            .map(|e| Contact::new(e.name.trim(), e.phone.trim()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_with_one_blank_row() {
        let list = ContactList::new();
        assert_eq!(list.len(), 1);
        assert!(!list.can_remove());
        assert!(list.filled().is_empty());
    }

    #[test]
    fn test_cannot_remove_last_row() {
        let mut list = ContactList::new();
        let only = list.iter().next().unwrap().id;
        assert!(!list.remove(only));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_add_update_remove() {
        let mut list = ContactList::new();
        let first = list.iter().next().unwrap().id;
        let second = list.add();
        assert_eq!(list.len(), 2);

        assert!(list.update(first, ContactField::Name, "Ahmad"));
        assert!(list.update(first, ContactField::Phone, "+60123456789"));
        assert!(list.update(second, ContactField::Name, "Nora"));
        assert!(!list.update(Uuid::new_v4(), ContactField::Name, "Ghost"));

        // Second row has no phone yet.
        assert_eq!(list.filled(), vec![Contact::new("Ahmad", "+60123456789")]);

        assert!(list.remove(second));
        assert!(!list.remove(second));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_from_empty_contacts_keeps_minimum() {
        let list = ContactList::from_contacts(&[]);
        assert_eq!(list.len(), MIN_CONTACTS);
    }
}
