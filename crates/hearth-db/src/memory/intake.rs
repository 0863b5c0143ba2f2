use chrono::Utc;
use hearth_core::models::{
    AdmissionInquiry, AdmissionStatus, Inquiry, InquiryStatus, NewAdmissionInquiry, NewInquiry,
    Notification, NotificationPayload, Page, PageRequest, PER_PAGE,
};
use hearth_core::AppError;
use uuid::Uuid;

use super::{remove_where, MemoryDatabase};
use crate::db::{AdmissionRepositoryTrait, InquiryRepositoryTrait, NotificationRepositoryTrait};

#[async_trait::async_trait]
impl InquiryRepositoryTrait for MemoryDatabase {
    async fn create(&self, new: NewInquiry) -> Result<Inquiry, AppError> {
        let inquiry = Inquiry::from_new(Uuid::new_v4(), new, Utc::now());
        self.tables.write().await.inquiries.push(inquiry.clone());
        Ok(inquiry)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Inquiry>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.inquiries.iter().find(|i| i.id == id).cloned())
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Inquiry>, AppError> {
        let tables = self.tables.read().await;
        let newest_first = tables.inquiries.iter().rev().cloned().collect();
        Ok(Page::from_sorted(newest_first, page, PER_PAGE))
    }

    async fn transition(&self, id: Uuid, status: InquiryStatus) -> Result<Inquiry, AppError> {
        let mut tables = self.tables.write().await;
        let inquiry = tables
            .inquiries
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Inquiry {}", id)))?;
        inquiry.apply_status(status, Utc::now());
        Ok(inquiry.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        Ok(remove_where(&mut tables.inquiries, |i| i.id == id))
    }
}

#[async_trait::async_trait]
impl AdmissionRepositoryTrait for MemoryDatabase {
    async fn create(&self, new: NewAdmissionInquiry) -> Result<AdmissionInquiry, AppError> {
        if new.medical_conditions.is_empty() {
            return Err(AppError::field(
                "medical_conditions",
                "The medical conditions field must have at least one item.",
            ));
        }
        let admission = AdmissionInquiry::from_new(Uuid::new_v4(), new, Utc::now());
        self.tables.write().await.admissions.push(admission.clone());
        Ok(admission)
    }

    async fn get(&self, id: Uuid) -> Result<Option<AdmissionInquiry>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.admissions.iter().find(|a| a.id == id).cloned())
    }

    async fn list(&self, page: PageRequest) -> Result<Page<AdmissionInquiry>, AppError> {
        let tables = self.tables.read().await;
        let newest_first = tables.admissions.iter().rev().cloned().collect();
        Ok(Page::from_sorted(newest_first, page, PER_PAGE))
    }

    async fn transition(
        &self,
        id: Uuid,
        status: AdmissionStatus,
    ) -> Result<AdmissionInquiry, AppError> {
        let mut tables = self.tables.write().await;
        let admission = tables
            .admissions
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Admission inquiry {}", id)))?;
        admission.apply_status(status, Utc::now());
        Ok(admission.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        Ok(remove_where(&mut tables.admissions, |a| a.id == id))
    }
}

#[async_trait::async_trait]
impl NotificationRepositoryTrait for MemoryDatabase {
    async fn create_for_recipients(
        &self,
        payload: &NotificationPayload,
        recipients: &[Uuid],
    ) -> Result<Vec<Notification>, AppError> {
        let now = Utc::now();
        let created: Vec<Notification> = recipients
            .iter()
            .map(|recipient_id| Notification {
                id: Uuid::new_v4(),
                notification_type: payload.type_name().to_string(),
                recipient_id: *recipient_id,
                data: payload.data(),
                read_at: None,
                created_at: now,
            })
            .collect();
        self.tables
            .write()
            .await
            .notifications
            .extend(created.iter().cloned());
        Ok(created)
    }

    async fn list_for_recipient(
        &self,
        recipient_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Notification>, AppError> {
        let tables = self.tables.read().await;
        let mine = tables
            .notifications
            .iter()
            .rev()
            .filter(|n| n.recipient_id == recipient_id)
            .cloned()
            .collect();
        Ok(Page::from_sorted(mine, page, PER_PAGE))
    }

    async fn unread_count(&self, recipient_id: Uuid) -> Result<i64, AppError> {
        let tables = self.tables.read().await;
        let count = tables
            .notifications
            .iter()
            .filter(|n| n.recipient_id == recipient_id && n.read_at.is_none())
            .count();
        Ok(count as i64)
    }

    async fn mark_read(
        &self,
        recipient_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Notification>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(notification) = tables
            .notifications
            .iter_mut()
            .find(|n| n.id == id && n.recipient_id == recipient_id)
        else {
            return Ok(None);
        };
        notification.read_at.get_or_insert_with(Utc::now);
        Ok(Some(notification.clone()))
    }

    async fn mark_all_read(&self, recipient_id: Uuid) -> Result<u64, AppError> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let mut changed = 0;
        for notification in tables
            .notifications
            .iter_mut()
            .filter(|n| n.recipient_id == recipient_id && n.read_at.is_none())
        {
            notification.read_at = Some(now);
            changed += 1;
        }
        Ok(changed)
    }
}
