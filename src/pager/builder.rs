// Page construction from raw lines (rankings, score lists and the like).

use chrono::{DateTime, Utc};

use super::error::PagerError;
use super::page::{EmbedAuthor, EmbedFooter, Page, GOLDFISH_COLOUR};
use super::page_set::chunk;

/// Builds one embed per `max_per_page` lines, all sharing the same title,
/// thumbnail and author.
///
/// ```
/// use goldfish_bot::pager::PageBuilder;
///
/// let lines: Vec<String> = (1..=23).map(|i| format!("[#{i}] player{i}")).collect();
/// let pages = PageBuilder::new("Rankings", lines, 10)
///     .formatter("```")
///     .body_header("Rank  Username")
///     .build()
///     .unwrap();
/// assert_eq!(pages.len(), 3);
/// assert_eq!(pages[2].footer.as_ref().unwrap().text, "Page 3 of 3");
/// ```
#[derive(Debug, Clone)]
pub struct PageBuilder {
    title: String,
    elements: Vec<String>,
    max_per_page: usize,
    thumbnail_url: Option<String>,
    author: Option<EmbedAuthor>,
    formatter: String,
    body_header: String,
    image_urls: Option<Vec<String>>,
    timestamps: Option<Vec<DateTime<Utc>>>,
    extra_footer: String,
    show_index: bool,
    colour: u32,
}

impl PageBuilder {
    pub fn new(title: impl Into<String>, elements: Vec<String>, max_per_page: usize) -> Self {
        Self {
            title: title.into(),
            elements,
            max_per_page,
            thumbnail_url: None,
            author: None,
            formatter: String::new(),
            body_header: String::new(),
            image_urls: None,
            timestamps: None,
            extra_footer: String::new(),
            show_index: true,
            colour: GOLDFISH_COLOUR,
        }
    }

    pub fn thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail_url = Some(url.into());
        self
    }

    pub fn author(mut self, author: EmbedAuthor) -> Self {
        self.author = Some(author);
        self
    }

    /// Wraps each page body, e.g. "```" for a code block.
    pub fn formatter(mut self, formatter: impl Into<String>) -> Self {
        self.formatter = formatter.into();
        self
    }

    /// Text placed verbatim at the top of every page body, inside the
    /// formatter. Include the trailing newline if one is wanted.
    pub fn body_header(mut self, header: impl Into<String>) -> Self {
        self.body_header = header.into();
        self
    }

    /// One image per page, in page order.
    pub fn images(mut self, urls: Vec<String>) -> Self {
        self.image_urls = Some(urls);
        self
    }

    /// One timestamp per page, in page order.
    pub fn timestamps(mut self, timestamps: Vec<DateTime<Utc>>) -> Self {
        self.timestamps = Some(timestamps);
        self
    }

    /// Appended to the footer, after the page index if shown.
    pub fn extra_footer(mut self, extra: impl Into<String>) -> Self {
        self.extra_footer = extra.into();
        self
    }

    pub fn show_index(mut self, show: bool) -> Self {
        self.show_index = show;
        self
    }

    pub fn colour(mut self, colour: u32) -> Self {
        self.colour = colour;
        self
    }

    pub fn build(self) -> Result<Vec<Page>, PagerError> {
        if self.elements.is_empty() {
            return Err(PagerError::invalid("nothing to paginate"));
        }
        let partitions: Vec<&[String]> = chunk(&self.elements, self.max_per_page)?.collect();
        let total = partitions.len();

        check_per_page("image urls", self.image_urls.as_deref(), total)?;
        check_per_page("timestamps", self.timestamps.as_deref(), total)?;

        let pages = partitions
            .into_iter()
            .enumerate()
            .map(|(i, lines)| {
                let body = format!(
                    "{f}{header}{lines}{f}",
                    f = self.formatter,
                    header = self.body_header,
                    lines = lines.join("\n"),
                );
                let mut page = Page::new()
                    .title(self.title.clone())
                    .description(body)
                    .colour(self.colour);

                if let Some(author) = &self.author {
                    page = page.author(author.clone());
                }
                if let Some(url) = &self.thumbnail_url {
                    page = page.thumbnail(url.clone());
                }
                if let Some(urls) = &self.image_urls {
                    page = page.image(urls[i].clone());
                }
                if let Some(timestamps) = &self.timestamps {
                    page = page.timestamp(timestamps[i]);
                }
                if let Some(footer) = self.footer_for(i, total) {
                    page = page.footer(footer);
                }
                page
            })
            .collect();
        Ok(pages)
    }

    fn footer_for(&self, index: usize, total: usize) -> Option<String> {
        if self.show_index {
            Some(format!("Page {} of {}{}", index + 1, total, self.extra_footer))
        } else if self.extra_footer.is_empty() {
            None
        } else {
            Some(self.extra_footer.clone())
        }
    }
}

/// Number ready-made pages: each footer becomes "Page i of n", followed by
/// " | " and the page's own footer text when it has one.
pub fn number_pages(pages: &mut [Page]) {
    let total = pages.len();
    for (i, page) in pages.iter_mut().enumerate() {
        let index = format!("Page {} of {}", i + 1, total);
        let text = match page.footer.take() {
            Some(footer) if !footer.text.is_empty() => format!("{index} | {}", footer.text),
            _ => index,
        };
        page.footer = Some(EmbedFooter { text });
    }
}

fn check_per_page<T>(what: &str, values: Option<&[T]>, pages: usize) -> Result<(), PagerError> {
    match values {
        Some(v) if v.len() != pages => Err(PagerError::invalid(format!(
            "expected {pages} {what}, got {}",
            v.len()
        ))),
        _ => Ok(()),
    }
}
