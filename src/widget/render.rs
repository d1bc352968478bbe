// HTML projection of a widget view, using the widget's stylesheet classes.
use crate::utils::escape_html;
use crate::widget::state::{
    Card, EnquiryView, FormStatus, ProductDetails, ResultsView, StatusKind, WidgetView,
};

pub fn render_card(card: &Card) -> String {
    let title = escape_html(&card.title);
    let img = match &card.image {
        Some(src) => format!(
            r#"<img class="sps-card-img" src="{}" alt="{}">"#,
            escape_html(src),
            title
        ),
        None => String::new(),
    };
    let price = match &card.price {
        Some(p) => format!(r#"<div class="sps-price">{}</div>"#, escape_html(p)),
        None => String::new(),
    };
    format!(
        r#"<div class="sps-card" data-idx="{idx}">{img}<div class="sps-card-body"><h4 class="sps-title">{title}</h4><p class="sps-desc">{desc}...</p>{price}<button type="button" class="sps-enquire-btn" data-product="{title}">Enquire</button></div></div>"#,
        idx = card.index,
        desc = escape_html(&card.summary),
    )
}

fn render_skeletons(count: usize) -> String {
    let skeleton = r#"<div class="sps-card skeleton"><div class="sps-card-img"></div><div class="sps-card-body"><div class="sps-title"></div><div class="sps-desc"></div><div class="sps-price"></div><div class="sps-btn"></div></div></div>"#;
    skeleton.repeat(count)
}

pub fn render_results(results: &ResultsView) -> String {
    let inner = match results {
        ResultsView::Idle => String::new(),
        ResultsView::Loading { placeholders } => render_skeletons(*placeholders),
        ResultsView::Cards(cards) => cards.iter().map(render_card).collect(),
        ResultsView::Empty => r#"<div class="sps-empty">No results found.</div>"#.to_string(),
        ResultsView::Error(msg) => format!(r#"<div class="sps-error">{}</div>"#, escape_html(msg)),
    };
    format!(r#"<div class="sps-results" aria-live="polite">{inner}</div>"#)
}

pub fn render_chips(chips: &[String]) -> String {
    let inner = if chips.is_empty() {
        "<small>No products selected</small>".to_string()
    } else {
        chips
            .iter()
            .map(|name| {
                let name = escape_html(name);
                format!(
                    r#"<span class="sps-tag">{name}<button type="button" class="sps-tag-remove" aria-label="Remove {name}">×</button></span>"#
                )
            })
            .collect()
    };
    format!(r#"<div class="sps-product-tags">{inner}</div>"#)
}

pub fn render_suggestions(names: &[String]) -> String {
    let inner: String = names
        .iter()
        .map(|name| {
            let name = escape_html(name);
            format!(r#"<div class="sps-suggestion" data-name="{name}">{name}</div>"#)
        })
        .collect();
    format!(r#"<div class="sps-suggestions">{inner}</div>"#)
}

fn render_status(status: &Option<FormStatus>) -> String {
    match status {
        None => r#"<div class="sps-form-status" style="display:none"></div>"#.to_string(),
        Some(status) => {
            let class = match status.kind {
                StatusKind::Success => "sps-success",
                StatusKind::Error => "sps-error",
            };
            format!(
                r#"<div class="sps-form-status {class}" style="display:block">{}</div>"#,
                escape_html(&status.text)
            )
        }
    }
}

fn render_details(details: &Option<ProductDetails>) -> String {
    let (display, title, desc, img) = match details {
        Some(d) => ("flex", d.title.as_str(), d.description.as_str(), d.image.as_str()),
        None => ("none", "", "", ""),
    };
    format!(
        r#"<div class="sps-product-modal" style="display:{display}"><div class="sps-product-overlay" aria-hidden="true"></div><div class="sps-product-box" role="dialog" aria-modal="true"><button type="button" class="sps-product-close" aria-label="Close">&times;</button><img id="sps-prod-img" src="{img}" alt=""><h3 id="sps-prod-title">{title}</h3><p id="sps-prod-desc">{desc}</p><button type="button" id="sps-prod-enquire">Enquire</button></div></div>"#,
        img = escape_html(img),
        title = escape_html(title),
        desc = escape_html(desc),
    )
}

fn render_enquiry(enquiry: &EnquiryView, nonce: &str) -> String {
    let display = if enquiry.open { "flex" } else { "none" };
    let open_class = if enquiry.open { " sps-open" } else { "" };
    let form = &enquiry.form;
    format!(
        concat!(
            r#"<div class="sps-modal{open_class}" style="display:{display}">"#,
            r#"<div class="sps-modal-overlay"></div><div class="sps-modal-box">"#,
            r#"<button type="button" class="sps-modal-close">&times;</button><h3>Enquiry</h3>"#,
            r#"<input type="text" class="sps-product-search" placeholder="Search products to add" value="{query}">"#,
            "{suggestions}{chips}",
            r#"<form id="sps-enquiry-form">"#,
            r#"<input type="hidden" name="action" value="sps_submit_enquiry">"#,
            r#"<input type="hidden" name="nonce" value="{nonce}">"#,
            r#"<input type="hidden" name="products" value="{products}">"#,
            r#"<input type="text" name="name" placeholder="Your Name" required value="{name}">"#,
            r#"<input type="email" name="email" placeholder="Your Email" required value="{email}">"#,
            r#"<textarea name="message" placeholder="Message">{message}</textarea>"#,
            r#"<button type="submit">Send Enquiry</button>{status}</form>"#,
            "</div></div>"
        ),
        open_class = open_class,
        display = display,
        query = escape_html(&enquiry.query),
        suggestions = render_suggestions(&enquiry.suggestions),
        chips = render_chips(&enquiry.chips),
        nonce = escape_html(nonce),
        products = escape_html(&enquiry.products_field),
        name = escape_html(&form.name),
        email = escape_html(&form.email),
        message = escape_html(&form.message),
        status = render_status(&enquiry.status),
    )
}

/// Full widget markup, as embedded in a page.
pub fn render_widget(view: &WidgetView, nonce: &str) -> String {
    format!(
        r#"<div class="sps-wrapper"><div class="sps-search-bar"><input class="sps-input" type="search" placeholder="Search products..." aria-label="Search products" value="{query}"></div>{results}{enquiry}</div>{details}"#,
        query = escape_html(&view.query),
        results = render_results(&view.results),
        enquiry = render_enquiry(&view.enquiry, nonce),
        details = render_details(&view.details),
    )
}
