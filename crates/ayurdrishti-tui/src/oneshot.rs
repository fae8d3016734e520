//! Non-interactive commands: one request, printed result.

use anyhow::{Result, anyhow};
use colored::*;
use ayurdrishti_core::{
    BackendClient, ChatFlow, ChatView, IdentifyFlow, IdentifyView, ImageUpload, LineKind, Organ,
    Settled, ViewLine,
};

pub async fn identify(client: &BackendClient, image_path: &str, organ: Organ) -> Result<()> {
    let image = ImageUpload::from_path(image_path).await?;

    println!(
        "🌿 Identifying {} ({}) as {}...",
        image.file_name.bold(),
        image.size_label().dimmed(),
        organ.display_name().cyan()
    );

    let mut flow = IdentifyFlow::new(0, organ);
    flow.select_image(image);
    flow.run(client).await?;

    if let Some(error) = flow.error() {
        return Err(anyhow!("{}", error));
    }
    let result = flow
        .result()
        .ok_or_else(|| anyhow!("backend returned no result"))?;
    print!("{}", format_identify(&IdentifyView::from(result)));
    Ok(())
}

pub fn format_identify(view: &IdentifyView) -> String {
    format!("\n{}", format_lines(view.lines()))
}

fn format_lines(lines: Vec<ViewLine>) -> String {
    let mut out = String::new();
    for line in lines {
        let text = match line.kind {
            LineKind::Field => {
                let label = format!("{}:", line.label.unwrap_or_default());
                format!("{} {}", label.dimmed(), line.text)
            }
            LineKind::Title => line.text.bold().green().to_string(),
            LineKind::Heading => line.text.bold().to_string(),
            LineKind::Caution => line.text.red().to_string(),
            LineKind::Notice => line.text.yellow().to_string(),
            LineKind::Detail => line.text.dimmed().to_string(),
            LineKind::Disclaimer => line.text.dimmed().italic().to_string(),
            LineKind::Use | LineKind::Body | LineKind::Blank => line.text,
        };
        out.push_str(&text);
        out.push('\n');
    }
    out
}

pub async fn ask(client: &BackendClient, message: &str) -> Result<()> {
    let mut flow = ChatFlow::new(0);
    flow.set_message(message);

    match flow.run(client).await? {
        None => {
            println!("{}", "Nothing to ask: the message is empty".yellow());
            return Ok(());
        }
        Some(Settled::Discarded) => return Err(anyhow!("response was discarded")),
        Some(Settled::Applied) => {}
    }

    if let Some(error) = flow.error() {
        return Err(anyhow!("{}", error));
    }
    let result = flow
        .result()
        .ok_or_else(|| anyhow!("backend returned no answer"))?;
    print!("{}", format_chat(&ChatView::from(result)));
    Ok(())
}

pub fn format_chat(view: &ChatView) -> String {
    format_lines(view.lines())
}

pub async fn status(client: &BackendClient) -> Result<()> {
    println!("Backend: {}", client.base().as_str().bold());
    match client.status().await {
        Ok(status) => {
            let state = if status.ok { "online".green() } else { "not ok".yellow() };
            println!("  status:  {}", state);
            if let Some(service) = &status.service {
                println!("  service: {}", service);
            }
            if status.mock {
                println!("  mode:    {}", "mock identifications".yellow());
            }
            Ok(())
        }
        Err(e) => {
            println!("  status:  {}", "unreachable".red());
            Err(anyhow!("{}", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ayurdrishti_core::{ChatResult, Enrichment, IdentifyResult};

    #[test]
    fn identify_output_contains_every_value() {
        colored::control::set_override(false);
        let result = IdentifyResult {
            scientific_name: Some("Ocimum tenuiflorum".into()),
            confidence: Some(0.91),
            common_names: vec!["Tulsi".into(), "Holy Basil".into()],
            enrichment: Some(Enrichment {
                medicinal_uses: vec!["cough".into()],
                contraindications: vec!["pregnancy".into()],
                ..Enrichment::default()
            }),
            ..IdentifyResult::default()
        };
        let out = format_identify(&IdentifyView::from(&result));
        assert!(out.contains("Ocimum tenuiflorum"));
        assert!(out.contains("Confidence: 0.91"));
        assert!(out.contains("Common names: Tulsi, Holy Basil"));
        assert!(out.contains("  • cough"));
        assert!(out.contains("  • pregnancy"));
        assert!(out.starts_with("\nOcimum tenuiflorum\n"));
    }

    #[test]
    fn chat_output_preserves_line_breaks() {
        colored::control::set_override(false);
        let out = format_chat(&ChatView::from(&ChatResult {
            answer: "Drink warm water.\nRest.".into(),
            disclaimer: "Not medical advice.".into(),
            lang: Some("en".into()),
        }));
        assert_eq!(out, "Drink warm water.\nRest.\n\nNot medical advice.\nLanguage: en\n");
    }
}
