//! Test helpers.

use std::{sync::Arc, time::Duration};

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};

use ticketflow_app::{
    context::AppContext,
    tickets::{
        MockTicketsService,
        models::{Priority, Status, Ticket, TicketNumber},
    },
    webhook::{WebhookConfig, WebhookNotifier},
};

use crate::state::State;

pub(crate) fn make_ticket(number: &str) -> Ticket {
    Ticket {
        ticket_number: TicketNumber::from(number),
        issue_title: "Printer offline".to_string(),
        issue_description: "The office printer refuses every job".to_string(),
        status: Status::Open,
        priority: Priority::Medium,
        email: "reporter@example.com".to_string(),
        phone_number: "0123456789".to_string(),
        notes: String::new(),
        created: Timestamp::UNIX_EPOCH,
        changed: Timestamp::UNIX_EPOCH,
    }
}

fn strict_tickets_mock() -> MockTicketsService {
    let mut tickets = MockTicketsService::new();

    tickets.expect_list_tickets().never();
    tickets.expect_get_ticket().never();
    tickets.expect_create_ticket().never();
    tickets.expect_update_ticket().never();
    tickets.expect_delete_ticket().never();

    tickets
}

/// A notifier pointed at a dead endpoint. Disabled notifiers never touch the
/// network; enabled ones fail fast and only log.
fn idle_webhook(enabled: bool) -> Arc<WebhookNotifier> {
    Arc::new(WebhookNotifier::new(WebhookConfig {
        url: "http://127.0.0.1:9/hook".to_string(),
        enabled,
        timeout: Duration::from_millis(100),
    }))
}

pub(crate) fn state_with_tickets(tickets: MockTicketsService) -> Arc<State> {
    Arc::new(State::new(AppContext::new(
        Arc::new(tickets),
        idle_webhook(false),
    )))
}

pub(crate) fn tickets_service(tickets: MockTicketsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_tickets(tickets)))
            .push(route),
    )
}

pub(crate) fn webhook_service(enabled: bool, route: Router) -> (Service, Arc<WebhookNotifier>) {
    let webhook = idle_webhook(enabled);

    let state = Arc::new(State::new(AppContext::new(
        Arc::new(strict_tickets_mock()),
        Arc::clone(&webhook),
    )));

    let service = Service::new(Router::new().hoop(inject(state)).push(route));

    (service, webhook)
}
