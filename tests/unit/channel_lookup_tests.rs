//! Unit tests for paginated channel name resolution.

use std::cell::RefCell;

use slack_morphism::prelude::SlackChannelId;

use zammad_slack_gateway::slack::gateway::{find_channel_in_pages, ChannelPage, ChannelSummary};
use zammad_slack_gateway::AppError;

fn channel(id: &str, name: &str) -> ChannelSummary {
    ChannelSummary {
        id: SlackChannelId(id.into()),
        name: Some(name.into()),
    }
}

fn pages() -> Vec<ChannelPage> {
    vec![
        ChannelPage {
            channels: vec![channel("C1", "general"), channel("C2", "random")],
            next_cursor: Some("c1".into()),
        },
        ChannelPage {
            channels: vec![
                ChannelSummary {
                    id: SlackChannelId("C3".into()),
                    name: None,
                },
                channel("C4", "helpdesk"),
            ],
            next_cursor: Some(String::new()),
        },
    ]
}

fn fetcher<'a>(
    pages: &'a [ChannelPage],
    cursors: &'a RefCell<Vec<Option<String>>>,
) -> impl FnMut(Option<String>) -> std::future::Ready<zammad_slack_gateway::Result<ChannelPage>> + 'a
{
    move |cursor| {
        let index = usize::from(cursor.is_some());
        cursors.borrow_mut().push(cursor);
        std::future::ready(Ok(pages[index].clone()))
    }
}

#[tokio::test]
async fn finds_channel_on_later_page() {
    let pages = pages();
    let cursors = RefCell::new(Vec::new());
    let found = find_channel_in_pages("helpdesk", fetcher(&pages, &cursors))
        .await
        .expect("lookup succeeds");
    assert_eq!(found, Some(SlackChannelId("C4".into())));
    assert_eq!(*cursors.borrow(), vec![None, Some("c1".to_owned())]);
}

#[tokio::test]
async fn stops_on_first_match() {
    let pages = pages();
    let cursors = RefCell::new(Vec::new());
    let found = find_channel_in_pages("general", fetcher(&pages, &cursors))
        .await
        .expect("lookup succeeds");
    assert_eq!(found, Some(SlackChannelId("C1".into())));
    assert_eq!(cursors.borrow().len(), 1);
}

#[tokio::test]
async fn leading_hash_is_ignored() {
    let pages = pages();
    let cursors = RefCell::new(Vec::new());
    let found = find_channel_in_pages("#random", fetcher(&pages, &cursors))
        .await
        .expect("lookup succeeds");
    assert_eq!(found, Some(SlackChannelId("C2".into())));
}

#[tokio::test]
async fn empty_cursor_ends_the_walk() {
    let pages = pages();
    let cursors = RefCell::new(Vec::new());
    let found = find_channel_in_pages("nowhere", fetcher(&pages, &cursors))
        .await
        .expect("lookup succeeds");
    assert_eq!(found, None);
    assert_eq!(cursors.borrow().len(), 2);
}

#[tokio::test]
async fn names_match_exactly() {
    let pages = pages();
    let cursors = RefCell::new(Vec::new());
    let found = find_channel_in_pages("Helpdesk", fetcher(&pages, &cursors))
        .await
        .expect("lookup succeeds");
    assert_eq!(found, None);
}

#[tokio::test]
async fn page_errors_propagate() {
    let result = find_channel_in_pages("helpdesk", |_| {
        std::future::ready(Err::<ChannelPage, _>(AppError::Slack("ratelimited".into())))
    })
    .await;
    assert!(matches!(result, Err(AppError::Slack(_))));
}
