//! Recommendation commands.

use anyhow::Result;
use market_sdk::prelude::{Product, ProductId, UserId};

use super::{LimitArgs, RecommendArgs, RelatedArgs};
use crate::context::Context;

/// Run the recommend command.
pub async fn run(args: RecommendArgs, ctx: &Context) -> Result<()> {
    let user = args.user.map(UserId::new);

    if args.profile {
        if let Some(user) = &user {
            match ctx.market.recommendations().profile(user).await {
                Ok(profile) if ctx.output.is_json() => ctx.output.json(&profile),
                Ok(profile) => {
                    ctx.output.header(&format!("Preferences for {}", user));
                    ctx.output.kv("Categories", &join(profile.top_categories.iter().map(|c| c.as_str())));
                    ctx.output.kv("Brands", &join(profile.top_brands.iter().map(String::as_str)));
                    ctx.output.kv("Stores", &join(profile.top_stores.iter().map(|s| s.as_str())));
                    ctx.output.kv("Purchased", &profile.purchased.len().to_string());
                }
                Err(e) => ctx.output.warn(&format!("Could not build profile: {}", e)),
            }
        }
    }

    let products = ctx.market.recommend(user.as_ref(), args.limit).await;
    let title = match &user {
        Some(user) => format!("Recommended for {}", user),
        None => "Recommended".to_string(),
    };
    print_products(ctx, &title, &products);
    Ok(())
}

/// Run the related command.
pub async fn related(args: RelatedArgs, ctx: &Context) -> Result<()> {
    let product = ProductId::new(args.product);
    let products = ctx.market.related(&product, args.limit).await;
    print_products(ctx, &format!("Related to {}", product), &products);
    Ok(())
}

/// Run the popular command.
pub async fn popular(args: LimitArgs, ctx: &Context) -> Result<()> {
    let products = ctx.market.popular(args.limit).await;
    print_products(ctx, "Popular", &products);
    Ok(())
}

/// Run the on-sale command.
pub async fn on_sale(args: LimitArgs, ctx: &Context) -> Result<()> {
    let products = ctx.market.on_sale(args.limit).await;
    print_products(ctx, "On sale", &products);
    Ok(())
}

fn print_products(ctx: &Context, title: &str, products: &[Product]) {
    if ctx.output.is_json() {
        ctx.output.json(&products);
        return;
    }
    ctx.output.header(title);
    if products.is_empty() {
        ctx.output.info("No products.");
        return;
    }
    ctx.output.products(products);
}

fn join<'a>(items: impl Iterator<Item = &'a str>) -> String {
    let joined: Vec<&str> = items.collect();
    if joined.is_empty() {
        "-".to_string()
    } else {
        joined.join(", ")
    }
}
