//! Button-driven embed pager.

use crate::framework::{Context, Error};
use poise::serenity_prelude as serenity;
use std::time::Duration;

/// Position within a fixed number of pages. Moving past either end wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    current: usize,
    total: usize,
}

impl PageCursor {
    /// Cursor on the first of `total` pages. `total` must be non-zero.
    pub const fn new(total: usize) -> Self {
        Self { current: 0, total }
    }

    /// Index of the current page.
    pub const fn current(&self) -> usize {
        self.current
    }

    /// Advances one page, wrapping to the first.
    pub fn next(&mut self) -> usize {
        self.current = (self.current + 1) % self.total;
        self.current
    }

    /// Goes back one page, wrapping to the last.
    pub fn prev(&mut self) -> usize {
        self.current = self.current.checked_sub(1).unwrap_or(self.total - 1);
        self.current
    }
}

/// Custom ids of the two buttons of one pager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagerButtons {
    prev: String,
    next: String,
}

impl PagerButtons {
    /// Button ids for the invocation with id `invocation`.
    pub fn for_invocation(invocation: u64) -> Self {
        Self {
            prev: format!("{invocation}prev"),
            next: format!("{invocation}next"),
        }
    }

    /// Whether `custom_id` is exactly one of this pager's buttons.
    pub fn owns(&self, custom_id: &str) -> bool {
        custom_id == self.prev || custom_id == self.next
    }

    /// Moves `cursor` for a press on `custom_id`. `None` for foreign buttons.
    pub fn press(&self, cursor: &mut PageCursor, custom_id: &str) -> Option<usize> {
        if custom_id == self.next {
            Some(cursor.next())
        } else if custom_id == self.prev {
            Some(cursor.prev())
        } else {
            None
        }
    }
}

/// Sends `pages` with previous/next buttons until nobody presses one for `timeout`.
pub async fn paginate(
    ctx: Context<'_>,
    pages: Vec<serenity::CreateEmbed>,
    timeout: Duration,
) -> Result<(), Error> {
    if pages.is_empty() {
        ctx.say("Nothing to show.").await?;
        return Ok(());
    }

    let ids = PagerButtons::for_invocation(ctx.id());

    let buttons = serenity::CreateActionRow::Buttons(vec![
        serenity::CreateButton::new(&ids.prev).emoji('◀'),
        serenity::CreateButton::new(&ids.next).emoji('▶'),
    ]);
    let reply = poise::CreateReply::default()
        .embed(pages[0].clone())
        .components(vec![buttons]);
    let handle = ctx.send(reply).await?;

    let mut cursor = PageCursor::new(pages.len());
    while let Some(press) = serenity::ComponentInteractionCollector::new(ctx.serenity_context())
        .author_id(ctx.author().id)
        .filter({
            let owned = ids.clone();
            move |press| owned.owns(&press.data.custom_id)
        })
        .timeout(timeout)
        .await
    {
        let Some(page) = ids.press(&mut cursor, &press.data.custom_id) else {
            continue;
        };

        press
            .create_response(
                ctx.serenity_context(),
                serenity::CreateInteractionResponse::UpdateMessage(
                    serenity::CreateInteractionResponseMessage::new().embed(pages[page].clone()),
                ),
            )
            .await?;
    }

    // Buttons are dead once the collector stops.
    handle
        .edit(
            ctx,
            poise::CreateReply::default()
                .embed(pages[cursor.current()].clone())
                .components(Vec::new()),
        )
        .await?;
    Ok(())
}
