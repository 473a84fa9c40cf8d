//! Plain-text rendering of the two screens.

use fetchdemo_core::{
    Location, View,
    posts::PostPage,
    weather::WeatherCard,
};

pub fn posts_header(delay_ms: u64) {
    println!("Post List");
    println!("Min loader: {delay_ms} ms");
    println!();
}

pub fn posts(view: &View<PostPage>) {
    match view {
        View::Loading => println!("Loading…"),
        View::Error(message) => println!("Error: {message}"),
        View::Empty => println!("No results found."),
        View::Ready(page) => {
            for post in &page.posts {
                println!("#{} {}", post.id, post.title);
            }
            println!();
            println!(
                "Page {} of {} ({} posts)",
                page.page + 1,
                page.total_pages,
                page.total_posts
            );
        }
    }
}

pub fn weather_header(location: &Location, delay_ms: u64) {
    println!("Weather Now — {}", location.name);
    println!(
        "Coords: {:.2}, {:.2} • Min loader: {delay_ms} ms",
        location.latitude, location.longitude
    );
    println!();
}

pub fn weather(view: &View<WeatherCard>) {
    match view {
        View::Loading => println!("Loading current weather…"),
        View::Error(message) => println!("Error: {message}"),
        View::Empty => println!("No current weather available."),
        View::Ready(card) => {
            println!("{}  {}", card.condition.emoji, card.condition.label);
            println!("{}°C", card.temperature_c);
            println!(
                "Wind: {} km/h ({} {}°)",
                card.wind_speed_kmh, card.wind_cardinal, card.wind_direction_deg
            );
            let updated = card
                .observed_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| card.time.clone());
            println!(
                "Daytime: {} • Updated: {updated}",
                if card.is_day { "Yes" } else { "No" }
            );
            println!("Code: {}", card.code);
        }
    }
}

pub fn locations(all: &[Location], default_key: &str) {
    for loc in all {
        let marker = if loc.key == default_key { '*' } else { ' ' };
        println!(
            "{marker} {:<12} {:<12} {:>7.2} {:>8.2}  {}",
            loc.key, loc.name, loc.latitude, loc.longitude, loc.timezone
        );
    }
}
