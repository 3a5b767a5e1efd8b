mod common;

use bson::oid::ObjectId;

use common::{init_tracing, services, services_with, wait_for_extraction, InMemoryProfileRepository};
use quote_builder_backend::branding::session::{ApplyOutcome, ThemeSource};
use quote_builder_backend::dto::profile_dto::{LogoUpload, SaveProfileRequest};
use quote_builder_backend::model::color::{HexColor, DEFAULT_THEME_COLOR};
use quote_builder_backend::model::profile::{LayoutStyle, Profile};
use quote_builder_backend::service::ProfileService;
use quote_builder_backend::util::error::ServiceError;

const SAVED_GREEN: HexColor = HexColor::rgb(0x22, 0x88, 0x44);
const LOGO_RED: HexColor = HexColor::rgb(0xd0, 0x21, 0x2b);
const LOGO_BLUE: HexColor = HexColor::rgb(0x1e, 0x40, 0xaf);

fn png_upload() -> LogoUpload {
    LogoUpload {
        filename: "logo.png".to_string(),
        content_type: "image/png".to_string(),
        content: vec![0x89, b'P', b'N', b'G', 0, 1, 2, 3],
    }
}

fn saved_profile(owner_id: ObjectId) -> Profile {
    let mut profile = Profile::empty(owner_id);
    profile.business_name = Some("Oficina do Zé".to_string());
    profile.theme_color = Some(SAVED_GREEN);
    profile
}

#[tokio::test]
async fn test_upload_stores_logo_and_applies_extracted_color() {
    init_tracing();
    let owner_id = ObjectId::new();
    let svc = services_with(InMemoryProfileRepository::with(saved_profile(owner_id)));
    svc.extractor.respond_by_default(LOGO_RED);

    let response = svc.profile_service.upload_logo(owner_id, png_upload()).await.unwrap();
    assert_eq!(response.ticket.value(), 1);

    let objects = svc.storage.objects.lock().unwrap().clone();
    assert_eq!(objects.len(), 1);
    let (name, size, content_type) = &objects[0];
    assert!(name.starts_with(&format!("{}/logo-", owner_id.to_hex())));
    assert!(name.ends_with(".png"));
    assert_eq!(*size, 8);
    assert_eq!(content_type.as_deref(), Some("image/png"));
    assert_eq!(response.logo_url, format!("https://cdn.test/logos/{}", name));

    wait_for_extraction(&svc.profile_service, owner_id).await;
    let state = svc.profile_service.branding_state(owner_id).await.unwrap();
    assert_eq!(state.theme_color, LOGO_RED);
    assert_eq!(state.theme_source, ThemeSource::Extracted);
    assert_eq!(state.logo_url.as_deref(), Some(response.logo_url.as_str()));
    assert!(state.dirty);

    // The logo is persisted right away, the color only on save
    let stored = svc.profile_repo.stored(owner_id).unwrap();
    assert_eq!(stored.logo_url, Some(response.logo_url.clone()));
    assert_eq!(stored.theme_color, Some(SAVED_GREEN));

    let saved = svc
        .profile_service
        .save_profile(owner_id, SaveProfileRequest::default())
        .await
        .unwrap();
    assert_eq!(saved.theme_color, Some(LOGO_RED));
    assert_eq!(saved.business_name.as_deref(), Some("Oficina do Zé"));

    let state = svc.profile_service.branding_state(owner_id).await.unwrap();
    assert_eq!(state.theme_source, ThemeSource::Saved);
    assert!(!state.dirty);
}

#[tokio::test]
async fn test_failed_extraction_keeps_saved_color() {
    init_tracing();
    let owner_id = ObjectId::new();
    let svc = services_with(InMemoryProfileRepository::with(saved_profile(owner_id)));
    // No scripted answer: every download fails

    let response = svc.profile_service.upload_logo(owner_id, png_upload()).await;
    assert!(response.is_ok());

    wait_for_extraction(&svc.profile_service, owner_id).await;
    let state = svc.profile_service.branding_state(owner_id).await.unwrap();
    assert_eq!(state.theme_color, SAVED_GREEN);
    assert_eq!(state.theme_source, ThemeSource::Saved);
    assert_eq!(state.extracted_color, None);
    assert!(!state.dirty);

    let stored = svc.profile_repo.stored(owner_id).unwrap();
    assert_eq!(stored.theme_color, Some(SAVED_GREEN));
    assert!(stored.logo_url.is_some());
}

#[tokio::test]
async fn test_failed_extraction_without_saved_color_uses_default() {
    let owner_id = ObjectId::new();
    let svc = services();

    svc.profile_service.upload_logo(owner_id, png_upload()).await.unwrap();
    wait_for_extraction(&svc.profile_service, owner_id).await;

    let state = svc.profile_service.branding_state(owner_id).await.unwrap();
    assert_eq!(state.theme_color, DEFAULT_THEME_COLOR);
    assert_eq!(state.theme_source, ThemeSource::Default);
}

#[tokio::test]
async fn test_late_result_for_older_logo_is_discarded() {
    init_tracing();
    let owner_id = ObjectId::new();
    let profile = saved_profile(owner_id);
    let svc = services_with(InMemoryProfileRepository::with(profile.clone()));

    let url_a = "https://cdn.test/logos/a.png";
    let url_b = "https://cdn.test/logos/b.png";
    svc.extractor.respond(url_a, Some(LOGO_RED));
    svc.extractor.respond(url_b, Some(LOGO_BLUE));
    let gate_a = svc.extractor.gate(url_a);
    let gate_b = svc.extractor.gate(url_b);

    let session = svc.profile_service.sessions.open(&profile);
    let (ticket_a, handle_a) = svc.profile_service.start_extraction(session.clone(), url_a.to_string());
    let (ticket_b, handle_b) = svc.profile_service.start_extraction(session.clone(), url_b.to_string());
    assert!(ticket_b > ticket_a);

    gate_b.notify_one();
    assert_eq!(handle_b.await.unwrap(), ApplyOutcome::Applied);
    assert_eq!(session.live_theme_color(), LOGO_BLUE);

    gate_a.notify_one();
    assert_eq!(handle_a.await.unwrap(), ApplyOutcome::Stale);

    let state = svc.profile_service.branding_state(owner_id).await.unwrap();
    assert_eq!(state.theme_color, LOGO_BLUE);
    assert_eq!(state.latest_ticket, Some(ticket_b));
    assert!(!state.extraction_pending);
}

#[tokio::test]
async fn test_stale_failure_does_not_clear_pending_newer_extraction() {
    let owner_id = ObjectId::new();
    let profile = saved_profile(owner_id);
    let svc = services_with(InMemoryProfileRepository::with(profile.clone()));

    let url_a = "https://cdn.test/logos/broken.png";
    let url_b = "https://cdn.test/logos/slow.png";
    svc.extractor.respond(url_b, Some(LOGO_BLUE));
    let gate_b = svc.extractor.gate(url_b);

    let session = svc.profile_service.sessions.open(&profile);
    let (_, handle_a) = svc.profile_service.start_extraction(session.clone(), url_a.to_string());
    let (_, handle_b) = svc.profile_service.start_extraction(session.clone(), url_b.to_string());

    assert_eq!(handle_a.await.unwrap(), ApplyOutcome::Stale);
    assert!(session.snapshot().extraction_pending);

    gate_b.notify_one();
    assert_eq!(handle_b.await.unwrap(), ApplyOutcome::Applied);
    assert_eq!(session.live_theme_color(), LOGO_BLUE);
}

#[tokio::test]
async fn test_new_upload_replaces_manual_color() {
    let owner_id = ObjectId::new();
    let svc = services_with(InMemoryProfileRepository::with(saved_profile(owner_id)));
    svc.extractor.respond_by_default(LOGO_RED);

    let purple = HexColor::rgb(0x7c, 0x3a, 0xed);
    let state = svc
        .profile_service
        .edit_branding(owner_id, Some(purple), Some(LayoutStyle::Classic))
        .await
        .unwrap();
    assert_eq!(state.theme_color, purple);
    assert_eq!(state.theme_source, ThemeSource::Manual);

    svc.profile_service.upload_logo(owner_id, png_upload()).await.unwrap();
    wait_for_extraction(&svc.profile_service, owner_id).await;

    let state = svc.profile_service.branding_state(owner_id).await.unwrap();
    assert_eq!(state.theme_color, LOGO_RED);
    assert_eq!(state.theme_source, ThemeSource::Extracted);
    assert_eq!(state.layout, LayoutStyle::Classic);

    // A manual pick after extraction wins again
    let state = svc.profile_service.edit_branding(owner_id, Some(purple), None).await.unwrap();
    assert_eq!(state.theme_source, ThemeSource::Manual);
}

#[tokio::test]
async fn test_discard_reverts_to_saved_profile() {
    let owner_id = ObjectId::new();
    let svc = services_with(InMemoryProfileRepository::with(saved_profile(owner_id)));

    assert!(!svc.profile_service.discard_session(owner_id));

    svc.profile_service
        .edit_branding(owner_id, Some(LOGO_BLUE), Some(LayoutStyle::Professional))
        .await
        .unwrap();
    assert!(svc.profile_service.discard_session(owner_id));

    let state = svc.profile_service.branding_state(owner_id).await.unwrap();
    assert_eq!(state.theme_color, SAVED_GREEN);
    assert_eq!(state.layout, LayoutStyle::Modern);
    assert!(!state.dirty);
    assert!(!svc.profile_service.discard_session(owner_id));

    let stored = svc.profile_repo.stored(owner_id).unwrap();
    assert_eq!(stored.theme_color, Some(SAVED_GREEN));
    assert_eq!(stored.layout_style, None);
}

#[tokio::test]
async fn test_extraction_finishing_after_discard_changes_nothing() {
    let owner_id = ObjectId::new();
    let profile = saved_profile(owner_id);
    let svc = services_with(InMemoryProfileRepository::with(profile.clone()));

    let url = "https://cdn.test/logos/late.png";
    svc.extractor.respond(url, Some(LOGO_RED));
    let gate = svc.extractor.gate(url);

    let session = svc.profile_service.sessions.open(&profile);
    let (_, handle) = svc.profile_service.start_extraction(session, url.to_string());
    assert!(svc.profile_service.discard_session(owner_id));

    gate.notify_one();
    handle.await.unwrap();

    let state = svc.profile_service.branding_state(owner_id).await.unwrap();
    assert_eq!(state.theme_color, SAVED_GREEN);
    assert_eq!(state.latest_ticket, None);
    assert_eq!(svc.profile_repo.stored(owner_id).unwrap().theme_color, Some(SAVED_GREEN));
}

#[tokio::test]
async fn test_explicit_color_on_save_wins_over_session() {
    let owner_id = ObjectId::new();
    let svc = services_with(InMemoryProfileRepository::with(saved_profile(owner_id)));
    svc.profile_service
        .edit_branding(owner_id, Some(LOGO_BLUE), None)
        .await
        .unwrap();

    let saved = svc
        .profile_service
        .save_profile(
            owner_id,
            SaveProfileRequest {
                theme_color: Some("#D0212B".to_string()),
                complete_onboarding: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(saved.theme_color, Some(LOGO_RED));
    assert!(saved.onboarded_at.is_some());
}

#[tokio::test]
async fn test_rejected_uploads_store_nothing() {
    let owner_id = ObjectId::new();
    let svc = services();

    let pdf = LogoUpload {
        content_type: "application/pdf".to_string(),
        ..png_upload()
    };
    let result = svc.profile_service.upload_logo(owner_id, pdf).await;
    assert!(matches!(result, Err(ServiceError::InvalidInput(_))));

    let empty = LogoUpload {
        content: Vec::new(),
        ..png_upload()
    };
    let result = svc.profile_service.upload_logo(owner_id, empty).await;
    assert!(matches!(result, Err(ServiceError::InvalidInput(_))));

    assert!(svc.storage.objects.lock().unwrap().is_empty());
    assert!(svc.profile_repo.stored(owner_id).is_none());
}

#[tokio::test]
async fn test_every_upload_issues_a_newer_ticket() {
    let owner_id = ObjectId::new();
    let svc = services();
    svc.extractor.respond_by_default(LOGO_RED);

    let first = svc.profile_service.upload_logo(owner_id, png_upload()).await.unwrap();
    let second = svc.profile_service.upload_logo(owner_id, png_upload()).await.unwrap();
    assert!(second.ticket > first.ticket);
    assert_ne!(first.logo_url, second.logo_url);
}

#[tokio::test]
async fn test_slow_storage_write_does_not_reorder_uploads() {
    init_tracing();
    let owner_id = ObjectId::new();
    let svc = services_with(InMemoryProfileRepository::with(saved_profile(owner_id)));
    svc.extractor.respond_by_default(LOGO_BLUE);

    let gate = svc.storage.hold_next_put();
    let service = svc.profile_service.clone();
    let first = tokio::spawn(async move { service.upload_logo(owner_id, png_upload()).await });

    // The first upload holds its ticket while its write is stuck
    loop {
        let state = svc.profile_service.branding_state(owner_id).await.unwrap();
        if state.latest_ticket.is_some() {
            break;
        }
        tokio::task::yield_now().await;
    }

    let second = svc.profile_service.upload_logo(owner_id, png_upload()).await.unwrap();
    let request = SaveProfileRequest {
        business_name: Some("Oficina Nova".to_string()),
        ..SaveProfileRequest::default()
    };
    svc.profile_service.save_profile(owner_id, request).await.unwrap();

    gate.notify_one();
    let first = first.await.unwrap().unwrap();
    assert!(first.ticket.value() < second.ticket.value());

    wait_for_extraction(&svc.profile_service, owner_id).await;
    let stored = svc.profile_repo.stored(owner_id).unwrap();
    assert_eq!(stored.logo_url.as_deref(), Some(second.logo_url.as_str()));
    assert_eq!(stored.business_name.as_deref(), Some("Oficina Nova"));

    let state = svc.profile_service.branding_state(owner_id).await.unwrap();
    assert_eq!(state.logo_url.as_deref(), Some(second.logo_url.as_str()));
    assert_eq!(state.latest_ticket, Some(second.ticket));
    assert_eq!(state.theme_color, LOGO_BLUE);
}
