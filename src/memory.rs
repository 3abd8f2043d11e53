//! In-process store used by tests in place of Postgres.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::appointments::repo::{Appointment, AppointmentRepo, NewAppointment};
use crate::auth::repo::UserRepo;
use crate::auth::repo_types::{NewUser, User};
use crate::db::Store;
use crate::notes::repo::{NoteRepo, WeekNote};
use crate::pregnancy::repo::{PregnancyRecord, PregnancyRepo};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    pregnancies: Vec<PregnancyRecord>,
    appointments: Vec<Appointment>,
    notes: Vec<WeekNote>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().expect("memory store poisoned")
    }

    pub fn pregnancy_count(&self) -> usize {
        self.lock().pregnancies.len()
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn create_user(&self, new: NewUser) -> anyhow::Result<Option<User>> {
        let mut t = self.lock();
        if t.users.iter().any(|u| u.email == new.email) {
            return Ok(None);
        }
        let user = User {
            id: Uuid::new_v4(),
            email: new.email,
            password_hash: new.password_hash,
            name: new.name,
            role: new.role,
            created_at: OffsetDateTime::now_utc(),
        };
        t.users.push(user.clone());
        Ok(Some(user))
    }

    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> anyhow::Result<bool> {
        let mut t = self.lock();
        match t.users.iter_mut().find(|u| u.id == id) {
            Some(u) => {
                u.password_hash = password_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl PregnancyRepo for MemoryStore {
    async fn find_pregnancy(&self, user_id: Uuid) -> anyhow::Result<Option<PregnancyRecord>> {
        Ok(self
            .lock()
            .pregnancies
            .iter()
            .find(|p| p.user_id == user_id)
            .cloned())
    }

    async fn upsert_pregnancy(
        &self,
        user_id: Uuid,
        start_date: Date,
    ) -> anyhow::Result<PregnancyRecord> {
        let mut t = self.lock();
        let now = OffsetDateTime::now_utc();
        if let Some(p) = t.pregnancies.iter_mut().find(|p| p.user_id == user_id) {
            p.start_date = start_date;
            p.updated_at = now;
            return Ok(p.clone());
        }
        let record = PregnancyRecord {
            id: Uuid::new_v4(),
            user_id,
            start_date,
            created_at: now,
            updated_at: now,
        };
        t.pregnancies.push(record.clone());
        Ok(record)
    }
}

#[async_trait]
impl AppointmentRepo for MemoryStore {
    async fn list_appointments(&self, user_id: Uuid) -> anyhow::Result<Vec<Appointment>> {
        let mut items: Vec<Appointment> = self
            .lock()
            .appointments
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        items.sort_by_key(|a| a.scheduled_at);
        Ok(items)
    }

    async fn create_appointment(
        &self,
        user_id: Uuid,
        new: NewAppointment,
    ) -> anyhow::Result<Appointment> {
        let appointment = Appointment {
            id: Uuid::new_v4(),
            user_id,
            title: new.title,
            scheduled_at: new.scheduled_at,
            location: new.location,
            notes: new.notes,
            created_at: OffsetDateTime::now_utc(),
        };
        self.lock().appointments.push(appointment.clone());
        Ok(appointment)
    }

    async fn delete_appointment(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let mut t = self.lock();
        let before = t.appointments.len();
        t.appointments
            .retain(|a| !(a.id == id && a.user_id == user_id));
        Ok(t.appointments.len() < before)
    }
}

#[async_trait]
impl NoteRepo for MemoryStore {
    async fn list_notes(&self, user_id: Uuid) -> anyhow::Result<Vec<WeekNote>> {
        let mut notes: Vec<WeekNote> = self
            .lock()
            .notes
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        notes.sort_by_key(|n| n.week);
        Ok(notes)
    }

    async fn upsert_note(
        &self,
        user_id: Uuid,
        week: i16,
        content: &str,
    ) -> anyhow::Result<WeekNote> {
        let mut t = self.lock();
        let now = OffsetDateTime::now_utc();
        if let Some(n) = t
            .notes
            .iter_mut()
            .find(|n| n.user_id == user_id && n.week == week)
        {
            n.content = content.to_string();
            n.updated_at = now;
            return Ok(n.clone());
        }
        let note = WeekNote {
            user_id,
            week,
            content: content.to_string(),
            updated_at: now,
        };
        t.notes.push(note.clone());
        Ok(note)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[tokio::test]
    async fn pregnancy_upsert_overwrites() {
        let store = MemoryStore::default();
        let user = Uuid::new_v4();

        let first = store
            .upsert_pregnancy(user, date!(2025 - 01 - 01))
            .await
            .unwrap();
        let second = store
            .upsert_pregnancy(user, date!(2025 - 02 - 01))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.start_date, date!(2025 - 02 - 01));
        assert_eq!(store.pregnancy_count(), 1);
    }

    #[tokio::test]
    async fn appointments_are_scoped_to_owner() {
        let store = MemoryStore::default();
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        let a = store
            .create_appointment(
                owner,
                NewAppointment {
                    title: "Ultrasound".into(),
                    scheduled_at: OffsetDateTime::now_utc(),
                    location: String::new(),
                    notes: None,
                },
            )
            .await
            .unwrap();

        assert!(!store.delete_appointment(other, a.id).await.unwrap());
        assert!(store.delete_appointment(owner, a.id).await.unwrap());
        assert!(store.list_appointments(owner).await.unwrap().is_empty());
    }
}
