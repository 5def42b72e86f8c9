//!
//! Server-rendered HTML. Pages are plain strings; every user-supplied value goes through [escape].
//!

use warbler_domain::flash;
use warbler_domain::message::{Message, MAX_MESSAGE_LENGTH};
use warbler_domain::user::repo::User;
use warbler_domain::user::Account;
use warbler_domain::UserId;

use axum::response::Html;
use axum_extra::extract::CookieJar;
use uuid::Uuid;

pub type Page = (CookieJar, Html<String>);

/// Wrap `body` in the site layout. Pending flashes are rendered and cleared from the jar.
pub fn page(jar: CookieJar, viewer: UserId<Option<Uuid>>, title: &str, body: &str) -> Page {
    let (jar, flashes) = flash::take(jar);

    let nav = match viewer.0 {
        Some(user_id) => format!(
            r#"<a href="/">Home</a> <a href="/users">Users</a> <a href="/messages/new">New message</a> <a href="/users/{user_id}">Profile</a> <a href="/logout">Log out</a>"#
        ),
        None => {
            r#"<a href="/">Home</a> <a href="/signup">Sign up</a> <a href="/login">Log in</a>"#
                .to_string()
        }
    };

    let mut html = format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{} | Warbler</title></head>\n<body>\n<nav>{nav}</nav>\n",
        escape(title)
    );
    for flash in &flashes {
        html.push_str(&format!(
            "<div class=\"alert alert-{}\">{}</div>\n",
            flash.category.as_str(),
            escape(&flash.message)
        ));
    }
    html.push_str("<main>\n");
    html.push_str(body);
    html.push_str("\n</main>\n</body>\n</html>\n");

    (jar, Html(html))
}

pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

fn error_line(error: Option<&str>) -> String {
    error
        .map(|error| format!("<p class=\"error\">{}</p>\n", escape(error)))
        .unwrap_or_default()
}

fn input(name: &str, kind: &str, value: Option<&str>) -> String {
    format!(
        r#"<label>{name} <input type="{kind}" name="{name}" value="{}"></label><br>"#,
        escape(value.unwrap_or_default())
    )
}

pub fn landing() -> String {
    r#"<h1>What's happening?</h1>
<p>New to Warbler?</p>
<a href="/signup">Sign up now</a>"#
        .to_string()
}

pub fn home(user: &User, timeline: &[Message]) -> String {
    format!(
        "<h1>@{}</h1>\n{}",
        escape(&user.username),
        message_list(timeline)
    )
}

pub fn signup_form(error: Option<&str>) -> String {
    format!(
        "<h1>Join Warbler today.</h1>\n{}<form method=\"POST\" action=\"/signup\">\n{}\n{}\n{}\n{}\n<button>Sign me up!</button>\n</form>",
        error_line(error),
        input("username", "text", None),
        input("email", "email", None),
        input("password", "password", None),
        input("image_url", "text", None),
    )
}

pub fn login_form(error: Option<&str>) -> String {
    format!(
        "<h1>Welcome back.</h1>\n{}<form method=\"POST\" action=\"/login\">\n{}\n{}\n<button>Log in</button>\n</form>",
        error_line(error),
        input("username", "text", None),
        input("password", "password", None),
    )
}

pub fn message_form(error: Option<&str>) -> String {
    format!(
        "<h1>Add a message</h1>\n{}<form method=\"POST\" action=\"/messages/new\">\n<textarea name=\"text\" maxlength=\"{MAX_MESSAGE_LENGTH}\" placeholder=\"What's happening?\"></textarea>\n<button>Add my message!</button>\n</form>",
        error_line(error),
    )
}

pub fn profile_form(account: &Account, error: Option<&str>) -> String {
    let user = &account.user;
    format!(
        "<h1>Edit Your Profile.</h1>\n{}<form method=\"POST\" action=\"/users/profile\">\n{}\n{}\n{}\n{}\n{}\n{}\n<p>To confirm changes, enter your password:</p>\n{}\n<button>Edit this user!</button>\n</form>\n<form method=\"POST\" action=\"/users/delete\"><button>Delete Profile</button></form>",
        error_line(error),
        input("username", "text", Some(&user.username)),
        input("email", "email", Some(&account.email)),
        input("image_url", "text", user.image_url.as_deref()),
        input("header_image_url", "text", user.header_image_url.as_deref()),
        input("bio", "text", user.bio.as_deref()),
        input("location", "text", user.location.as_deref()),
        input("password", "password", None),
    )
}

/// What the viewer can do about the profile they are looking at.
pub enum FollowButton {
    Hidden,
    Follow,
    StopFollowing,
    EditOwn,
}

pub struct UserDetail<'a> {
    pub user: &'a User,
    pub messages: &'a [Message],
    pub following_count: usize,
    pub followers_count: usize,
    pub button: FollowButton,
}

pub fn user_detail(detail: UserDetail<'_>) -> String {
    let user = detail.user;
    let user_id = user.user_id;

    let button = match detail.button {
        FollowButton::Hidden => String::new(),
        FollowButton::Follow => format!(
            r#"<form method="POST" action="/users/follow/{user_id}"><button>Follow</button></form>"#
        ),
        FollowButton::StopFollowing => format!(
            r#"<form method="POST" action="/users/stop-following/{user_id}"><button>Unfollow</button></form>"#
        ),
        FollowButton::EditOwn => r#"<a href="/users/profile">Edit Profile</a>"#.to_string(),
    };

    let mut html = format!("<h1>@{}</h1>\n", escape(&user.username));
    if let Some(image_url) = &user.image_url {
        html.push_str(&format!(
            "<img src=\"{}\" alt=\"Image for {}\">\n",
            escape(image_url),
            escape(&user.username)
        ));
    }
    if let Some(bio) = &user.bio {
        html.push_str(&format!("<p class=\"bio\">{}</p>\n", escape(bio)));
    }
    if let Some(location) = &user.location {
        html.push_str(&format!("<p class=\"location\">{}</p>\n", escape(location)));
    }
    html.push_str(&format!(
        "<ul class=\"stats\">\n<li><a href=\"/users/{user_id}\">{} messages</a></li>\n<li><a href=\"/users/{user_id}/following\">{} following</a></li>\n<li><a href=\"/users/{user_id}/followers\">{} followers</a></li>\n</ul>\n",
        detail.messages.len(),
        detail.following_count,
        detail.followers_count,
    ));
    html.push_str(&button);
    html.push('\n');
    html.push_str(&message_list(detail.messages));
    html
}

pub fn user_list(heading: &str, users: &[User]) -> String {
    if users.is_empty() {
        return format!("<h1>{}</h1>\n<h3>Sorry, no users found</h3>", escape(heading));
    }

    let mut html = format!("<h1>{}</h1>\n<ul class=\"users\">\n", escape(heading));
    for user in users {
        html.push_str(&format!(
            "<li><a href=\"/users/{}\">@{}</a></li>\n",
            user.user_id,
            escape(&user.username)
        ));
    }
    html.push_str("</ul>");
    html
}

pub fn search_form(query: Option<&str>) -> String {
    format!(
        r#"<form method="GET" action="/users"><input name="q" placeholder="Search Warbler" value="{}"><button>Search</button></form>"#,
        escape(query.unwrap_or_default())
    )
}

pub fn message_detail(message: &Message, can_delete: bool) -> String {
    let mut html = format!(
        "<article class=\"message\">\n<a href=\"/users/{}\">@{}</a>\n<p>{}</p>\n<span class=\"date\">{}</span>\n</article>\n",
        message.author,
        escape(&message.author_username),
        escape(&message.text),
        message.timestamp.date(),
    );
    if can_delete {
        html.push_str(&format!(
            r#"<form method="POST" action="/messages/{}/delete"><button>Delete</button></form>"#,
            message.message_id
        ));
    }
    html
}

fn message_list(messages: &[Message]) -> String {
    let mut html = String::from("<ul class=\"messages\">\n");
    for message in messages {
        html.push_str(&format!(
            "<li><a href=\"/messages/{}\">{}</a> <a href=\"/users/{}\">@{}</a> <span class=\"date\">{}</span></li>\n",
            message.message_id,
            escape(&message.text),
            message.author,
            escape(&message.author_username),
            message.timestamp.date(),
        ));
    }
    html.push_str("</ul>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use warbler_domain::flash::{Flash, FlashCategory};

    #[test]
    fn should_escape_markup() {
        assert_eq!(
            "&lt;script&gt;alert(&quot;x&quot; &amp; &#x27;y&#x27;)&lt;/script&gt;",
            escape(r#"<script>alert("x" & 'y')</script>"#)
        );
    }

    #[test]
    fn page_should_render_and_clear_flashes() {
        let jar = Flash::new(FlashCategory::Danger, "<b>oops</b>").add_to(CookieJar::new());

        let (jar, Html(html)) = page(jar, UserId(None), "Title", "body");

        assert!(html.contains(r#"<div class="alert alert-danger">&lt;b&gt;oops&lt;/b&gt;</div>"#));
        assert!(html.contains(r#"<a href="/login">Log in</a>"#));

        let (_, flashes) = flash::take(jar);
        assert!(flashes.is_empty());
    }

    #[test]
    fn logged_in_nav_should_link_own_profile() {
        let user_id = Uuid::new_v4();
        let (_, Html(html)) = page(CookieJar::new(), UserId(Some(user_id)), "Home", "");

        assert!(html.contains(&format!(r#"<a href="/users/{user_id}">Profile</a>"#)));
        assert!(html.contains(r#"<a href="/logout">Log out</a>"#));
    }
}
