//! Share text and social intent links for a generated wallpaper.

use serde::Serialize;

/// Subject line used for e-mail shares.
const EMAIL_SUBJECT: &str = "Amazing AI Wallpaper";

/// Text accompanying every share.
pub fn share_text(prompt: &str) -> String {
    format!("Check out this amazing AI-generated wallpaper: \"{prompt}\"")
}

/// Social networks with a web share intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialTarget {
    Twitter,
    Facebook,
    Whatsapp,
    Email,
}

impl SocialTarget {
    pub const ALL: [SocialTarget; 4] = [
        SocialTarget::Twitter,
        SocialTarget::Facebook,
        SocialTarget::Whatsapp,
        SocialTarget::Email,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SocialTarget::Twitter => "Twitter",
            SocialTarget::Facebook => "Facebook",
            SocialTarget::Whatsapp => "WhatsApp",
            SocialTarget::Email => "Email",
        }
    }
}

/// Build the intent URL that shares `prompt` and `app_url` on `target`.
pub fn share_link(target: SocialTarget, prompt: &str, app_url: &str) -> String {
    let text = urlencoding::encode(&share_text(prompt)).into_owned();
    let url = urlencoding::encode(app_url).into_owned();

    match target {
        SocialTarget::Twitter => format!("https://twitter.com/intent/tweet?text={text}&url={url}"),
        SocialTarget::Facebook => {
            format!("https://www.facebook.com/sharer/sharer.php?u={url}&quote={text}")
        }
        SocialTarget::Whatsapp => format!("https://wa.me/?text={text}%20{url}"),
        SocialTarget::Email => format!(
            "mailto:?subject={}&body={text}%20{url}",
            urlencoding::encode(EMAIL_SUBJECT)
        ),
    }
}
