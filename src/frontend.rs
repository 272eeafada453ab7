use web_sys::{window, HtmlCanvasElement, HtmlElement};
use yew::prelude::*;

use crate::content::{
    Asset, Card, CardBody, CardSection, LinkSection, ProfileLink, ABOUT_HEADING, ABOUT_TEXT,
    CARD_SECTIONS, LINK_SECTIONS, PHOTO, PHOTO_SIZE_PX,
};
use crate::scene::title::TITLE_TEXT;
use crate::scene::SceneConfig;
use crate::stage::{log_js_error, StageHandle};
use crate::telemetry::LogLevel;

fn prefers_reduced_motion() -> bool {
    window()
        .and_then(|w| {
            w.match_media("(prefers-reduced-motion: reduce)")
                .ok()
                .flatten()
        })
        .map(|mq| mq.matches())
        .unwrap_or(false)
}

fn location_query() -> String {
    window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default()
}

fn scene_config() -> SceneConfig {
    SceneConfig::default()
        .with_query(&location_query())
        .with_reduced_motion(prefers_reduced_motion())
}

fn mount_stage(hero_ref: &NodeRef, canvas_ref: &NodeRef) -> Option<StageHandle> {
    let hero = hero_ref.cast::<HtmlElement>()?;
    let canvas = canvas_ref.cast::<HtmlCanvasElement>()?;

    match StageHandle::mount(canvas, hero, &scene_config()) {
        Ok(stage) => Some(stage),
        Err(error) => {
            log_js_error(LogLevel::Warn, "scene_mount_failed", &error);
            None
        }
    }
}

#[function_component(Hero)]
fn hero() -> Html {
    let hero_ref = use_node_ref();
    let canvas_ref = use_node_ref();
    let scene_failed = use_state(|| false);

    {
        let hero_ref = hero_ref.clone();
        let canvas_ref = canvas_ref.clone();
        let scene_failed = scene_failed.clone();
        use_effect_with((), move |_| {
            let stage = mount_stage(&hero_ref, &canvas_ref);
            if stage.is_none() {
                scene_failed.set(true);
            }
            move || drop(stage)
        });
    }

    html! {
        <section class="hero" ref={hero_ref} aria-labelledby="hero-heading">
            <div class="hero-canvas">
                <canvas ref={canvas_ref} aria-hidden="true"></canvas>
            </div>
            <h1
                id="hero-heading"
                class={classes!(if *scene_failed { "hero-fallback" } else { "sr-only" })}
            >
                {TITLE_TEXT}
            </h1>
        </section>
    }
}

#[function_component(AboutSection)]
fn about_section() -> Html {
    let photo_style = format!("width: {PHOTO_SIZE_PX}px; height: {PHOTO_SIZE_PX}px;");

    html! {
        <section class="about-section" aria-labelledby="about-heading">
            <h2 id="about-heading">{ABOUT_HEADING}</h2>
            <img class="portrait" src={PHOTO.src} alt={PHOTO.alt} style={photo_style} />
            <p>{ABOUT_TEXT}</p>
        </section>
    }
}

fn card_view(card: &Card) -> Html {
    let body = match card.body {
        CardBody::Text(text) => html! { <p>{text}</p> },
        CardBody::Points(points) => html! {
            <ul class="card-points">
                { for points.iter().map(|point| html! { <li>{*point}</li> }) }
            </ul>
        },
    };

    html! {
        <div class="card">
            <h3>{card.title}</h3>
            {body}
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct CardSectionProps {
    section: CardSection,
}

#[function_component(CardSectionView)]
fn card_section_view(props: &CardSectionProps) -> Html {
    let section = props.section;

    html! {
        <section class={section.class} aria-labelledby={section.id}>
            <h2 id={section.id}>{section.heading}</h2>
            <div class="cards-container">
                { for section.cards.iter().map(card_view) }
            </div>
        </section>
    }
}

#[derive(Properties, PartialEq)]
struct ProfileLinkProps {
    link: ProfileLink,
}

#[function_component(ProfileLinkView)]
fn profile_link_view(props: &ProfileLinkProps) -> Html {
    let ProfileLink {
        label,
        href,
        icon: Asset { src, alt },
        accent,
    } = props.link;
    let accent_style = format!("color: {accent};");

    html! {
        <>
            <img class="profile-icon" src={src} alt={alt} />
            <a
                class="link"
                href={href}
                target="_blank"
                rel="noopener noreferrer"
                style={accent_style}
            >
                {label}
                <span class="sr-only">{" (opens in a new tab)"}</span>
            </a>
        </>
    }
}

#[derive(Properties, PartialEq)]
struct LinkSectionProps {
    section: LinkSection,
}

#[function_component(LinkSectionView)]
fn link_section_view(props: &LinkSectionProps) -> Html {
    let section = props.section;

    html! {
        <section class={section.class} aria-labelledby={section.id}>
            <h2 id={section.id}>{section.heading}</h2>
            <p>
                {section.lead}
                <br />
                <ProfileLinkView link={section.link} />
            </p>
        </section>
    }
}

#[function_component(App)]
fn app() -> Html {
    html! {
        <div class="portfolio">
            <Hero />
            <main id="content" class="content">
                <AboutSection />
                { for CARD_SECTIONS.iter().map(|section| html! {
                    <CardSectionView key={section.id} section={*section} />
                }) }
                { for LINK_SECTIONS.iter().map(|section| html! {
                    <LinkSectionView key={section.id} section={*section} />
                }) }
            </main>
        </div>
    }
}

pub fn run() {
    yew::Renderer::<App>::with_root(
        window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("app"))
            .expect("missing #app mount point"),
    )
    .render();
}
