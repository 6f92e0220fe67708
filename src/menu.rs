use colored::Colorize;
use inquire::{MultiSelect, Select};

use crate::{
    coauthor::Coauthor,
    command::Partner,
    error::AppError,
    git::TemplateConfig,
    manifest::Manifest,
    table,
    validation::{prompt_until_valid, validate_input_email, validate_input_id, validate_input_name},
};

/// Runs interactive menu interface
pub fn run_menu<C: TemplateConfig>(partner: &Partner<C>) -> Result<(), AppError> {
    loop {
        let actions: Vec<&'static str> = vec![
            "activate coauthors",
            "clear active coauthors",
            "show active coauthors",
            "list coauthors",
            "add coauthor",
            "quit",
        ];

        let action_selected: &'static str =
            Select::new(&format!("{}", "select action".blue()), actions).prompt()?;

        let outcome = match action_selected {
            "activate coauthors" => menu_activate(partner),
            "clear active coauthors" => partner
                .template_clear()
                .map(|_| println!("{}", "cleared active coauthors".green())),
            "show active coauthors" => partner
                .template_status()
                .and_then(|active| print_coauthors(&active)),
            "list coauthors" => partner
                .manifest_list()
                .and_then(|coauthors| print_coauthors(&coauthors)),
            "add coauthor" => menu_add_coauthor(partner),
            "quit" => {
                println!("{}", "quitting".yellow());
                break Ok(());
            }
            _ => unreachable!("unexpected input"),
        };

        // Domain errors are reported and the menu keeps going.
        match outcome {
            Err(err @ AppError::Inquire(_)) => return Err(err),
            Err(err) => println!("{}", err.to_string().red()),
            Ok(()) => {}
        }
    }
}

fn print_coauthors(coauthors: &[Coauthor]) -> Result<(), AppError> {
    if coauthors.is_empty() {
        println!("{}", "no coauthors to show".yellow());
        return Ok(());
    }
    table::write_coauthors(&mut std::io::stdout().lock(), coauthors)?;
    Ok(())
}

/// Menu for picking coauthors to activate
fn menu_activate<C: TemplateConfig>(partner: &Partner<C>) -> Result<(), AppError> {
    let coauthors = partner.manifest_list()?;
    if coauthors.is_empty() {
        println!("{}", "no coauthors in manifest".red());
        return Ok(());
    }

    let active: Vec<String> = partner.template_status()?.into_iter().map(|c| c.id).collect();
    let options: Vec<String> = coauthors.iter().map(|c| c.id.clone()).collect();
    let defaults: Vec<usize> = options
        .iter()
        .enumerate()
        .filter(|(_, id)| active.contains(*id))
        .map(|(index, _)| index)
        .collect();

    let selected = MultiSelect::new(&format!("{}", "select coauthors:".blue()), options)
        .with_default(&defaults)
        .prompt()?;

    if selected.is_empty() {
        partner.template_clear()?;
        println!("{}", "cleared active coauthors".green());
        return Ok(());
    }

    let activated = partner.template_replace(&selected)?;
    println!("{} {}", "active coauthors:".green(), activated.len());
    Ok(())
}

/// Menu for adding a new coauthor
fn menu_add_coauthor<C: TemplateConfig>(partner: &Partner<C>) -> Result<(), AppError> {
    let manifest = Manifest::load(&partner.paths.manifest_file)?;

    let id: String = prompt_until_valid(&format!("{}", "enter id:".blue()), |input| {
        validate_input_id(input, &manifest)
    })?;
    let name: String = prompt_until_valid(
        &format!("{}", "enter name:".blue()),
        validate_input_name,
    )?;
    let email: String = prompt_until_valid(
        &format!("{}", "enter email:".blue()),
        validate_input_email,
    )?;

    partner.manifest_add(&id, &name, &email)?;
    println!("{} {}", "added coauthor:".green(), id);
    Ok(())
}
