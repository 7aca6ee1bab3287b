use anyhow::{Context, bail};
use cgmath::Vector3;

use crate::data_structures::{block::TemplateId, rule::SubstitutionRule};

/**
 * Parse a substitution rule file.
 *
 * ```text
 * # comment
 * ! <scale down> <unit scale>
 * <id> <x> <y> <z> <quarter turns> [<sx> <sy> <sz>]
 * ```
 *
 * A `!` directive changes the constants of all entries that follow it.
 */
pub fn parse_rule(file_name: &str, text: &str) -> anyhow::Result<SubstitutionRule> {
    let mut rule = SubstitutionRule::new();
    for (n, line) in text.lines().enumerate() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        parse_line(&mut rule, &fields)
            .with_context(|| format!("{file_name}:{}: invalid rule `{}`", n + 1, line.trim()))?;
    }
    log::debug!("Loaded {} substitution entries from {file_name}", rule.len());
    Ok(rule)
}

fn parse_line(rule: &mut SubstitutionRule, fields: &[&str]) -> anyhow::Result<()> {
    match fields {
        [] => {}
        [first, ..] if first.starts_with('#') => {}
        ["!", scale_down, unit_scale] => {
            rule.set_scaling(number(scale_down)?, number(unit_scale)?);
        }
        ["!", ..] => bail!("expected `! <scale down> <unit scale>`"),
        [id, x, y, z, turns, extra @ ..] => {
            let id: TemplateId = id
                .parse()
                .with_context(|| format!("`{id}` is not a block template id"))?;
            let extra_scale = match extra {
                [] => None,
                [sx, sy, sz] => Some(Vector3::new(number(sx)?, number(sy)?, number(sz)?)),
                _ => bail!("extra scale needs exactly three components"),
            };
            rule.push(
                id,
                Vector3::new(number(x)?, number(y)?, number(z)?),
                number(turns)?,
                extra_scale,
            );
        }
        _ => bail!("expected `<id> <x> <y> <z> <quarter turns> [<sx> <sy> <sz>]`"),
    }
    Ok(())
}

fn number(field: &str) -> anyhow::Result<f32> {
    let value: f32 = field
        .parse()
        .with_context(|| format!("`{field}` is not a number"))?;
    if !value.is_finite() {
        bail!("`{field}` is not a finite number");
    }
    Ok(value)
}
