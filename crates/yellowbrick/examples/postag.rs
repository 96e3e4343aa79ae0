use anyhow::Result;
use yellowbrick::prelude::*;

fn tag(sentence: &[(&str, &str)]) -> Vec<(String, String)> {
    sentence
        .iter()
        .map(|(token, tag)| (token.to_string(), tag.to_string()))
        .collect()
}

fn main() -> Result<()> {
    env_logger::init();

    let corpus: Vec<TaggedDocument> = vec![
        vec![
            tag(&[("The", "DT"), ("quick", "JJ"), ("fox", "NN"), ("jumps", "VBZ"), (".", ".")]),
            tag(&[("Both", "PDT"), ("the", "DT"), ("dogs", "NNS"), ("sleep", "VBP")]),
        ],
        vec![
            tag(&[("Who", "WP"), ("will", "MD"), ("win", "VB"), ("?", ".")]),
            tag(&[("They", "PRP"), ("ran", "VBD"), ("to", "TO"), ("42", "CD"), ("gates", "NNS")]),
        ],
        vec![tag(&[("Wow", "UH"), ("!", "."), ("There", "EX"), ("'s", "VBZ"), ("cake", "NN")])],
    ];
    let y: Vec<String> = ["fable", "news", "fable"].iter().map(|s| s.to_string()).collect();

    let config = PosTagConfig {
        stack: true,
        frequency: true,
        colormap: Some("Set1".into()),
        ..Default::default()
    };
    let mut viz = PosTagVisualizer::new(&config)?;
    viz.fit(&corpus, Some(y.as_slice()))?;
    println!("Counted {} tokens: {:?}", viz.token_count(), viz.totals());

    std::fs::create_dir_all("target/yellowbrick")?;
    let outcome = viz.poof(Some(std::path::Path::new("target/yellowbrick/postag.html")), true)?;
    for warning in outcome.warnings {
        log::warn!("{}", warning);
    }
    Ok(())
}
