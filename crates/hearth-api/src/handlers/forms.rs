//! Public form submissions: contact, admission inquiry and testimonials.
//!
//! Each handler normalizes the raw submission, persists the record and redirects
//! with a flash message. Invalid input is answered with 422 and the submitted
//! values so the form can be redrawn. Notification fan-out only enqueues jobs and
//! never fails the request.

use axum::{extract::State, response::Response};
use hearth_core::intake::{normalize_admission, normalize_contact, FieldReader, LONG_TEXT_MAX, TEXT_MAX};
use hearth_core::models::{NewTestimonial, TestimonialStatus, MAX_RATING, MIN_RATING};
use std::sync::Arc;

use crate::error::FormError;
use crate::state::AppState;
use crate::utils::flash::redirect_with_flash;
use crate::utils::form::FormSubmission;

pub const CONTACT_SUCCESS: &str = "Thank you for reaching out. We will get back to you shortly.";
pub const INQUIRY_SUCCESS: &str =
    "Thank you for your inquiry. Our admissions team will contact you within one business day.";
pub const TESTIMONIAL_SUCCESS: &str =
    "Thank you for sharing your experience. Your testimonial will appear once it has been reviewed.";

#[utoipa::path(
    post,
    path = "/contact",
    tag = "forms",
    responses(
        (status = 303, description = "Inquiry stored; redirect to /contact with a flash message"),
        (status = 422, description = "Field errors and the submitted values", body = crate::error::FormErrorResponse)
    )
)]
#[tracing::instrument(skip(state, form))]
pub async fn submit_contact(
    State(state): State<Arc<AppState>>,
    FormSubmission(form): FormSubmission,
) -> Result<Response, FormError> {
    let new = normalize_contact(&form).map_err(|errors| FormError::invalid(errors, &form))?;
    let inquiry = state.db.inquiries.create(new).await?;
    tracing::info!(inquiry_id = %inquiry.id, "Contact inquiry received");

    state.fanout.dispatch_inquiry(&inquiry).await;
    Ok(redirect_with_flash("/contact", CONTACT_SUCCESS))
}

#[utoipa::path(
    post,
    path = "/inquire",
    tag = "forms",
    responses(
        (status = 303, description = "Admission inquiry stored; redirect to /inquire with a flash message"),
        (status = 422, description = "Field errors and the submitted values", body = crate::error::FormErrorResponse)
    )
)]
#[tracing::instrument(skip(state, form))]
pub async fn submit_inquiry(
    State(state): State<Arc<AppState>>,
    FormSubmission(form): FormSubmission,
) -> Result<Response, FormError> {
    let today = state.config.today();
    let new =
        normalize_admission(&form, today).map_err(|errors| FormError::invalid(errors, &form))?;
    let admission = state.db.admissions.create(new).await?;
    tracing::info!(
        admission_inquiry_id = %admission.id,
        care_service = ?admission.care_service,
        "Admission inquiry received"
    );

    state.fanout.dispatch_admission(&admission).await;
    Ok(redirect_with_flash("/inquire", INQUIRY_SUCCESS))
}

#[utoipa::path(
    post,
    path = "/testimonials",
    tag = "forms",
    responses(
        (status = 303, description = "Testimonial stored as pending; redirect to /"),
        (status = 422, description = "Field errors and the submitted values", body = crate::error::FormErrorResponse)
    )
)]
#[tracing::instrument(skip(state, form))]
pub async fn submit_testimonial(
    State(state): State<Arc<AppState>>,
    FormSubmission(form): FormSubmission,
) -> Result<Response, FormError> {
    let mut reader = FieldReader::new(&form);
    let name = reader.required_text("name", TEXT_MAX);
    let relation = reader.required_text("relation", TEXT_MAX);
    let content = reader.required_text("content", LONG_TEXT_MAX);
    let rating = if form.text("rating").is_none() {
        reader.reject("rating", "The rating field is required.");
        None
    } else {
        reader.integer("rating", i64::from(MIN_RATING), i64::from(MAX_RATING))
    };
    let errors = reader.finish();

    let (Some(name), Some(relation), Some(content), Some(rating)) = (name, relation, content, rating)
    else {
        return Err(FormError::invalid(errors, &form));
    };

    let testimonial = state
        .db
        .testimonials
        .create(NewTestimonial {
            name,
            relation,
            content,
            rating: rating as i16,
            status: TestimonialStatus::Pending,
        })
        .await?;
    tracing::info!(testimonial_id = %testimonial.id, "Testimonial submitted for review");

    Ok(redirect_with_flash("/", TESTIMONIAL_SUCCESS))
}
