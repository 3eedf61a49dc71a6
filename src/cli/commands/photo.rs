//! `velo photo` command - Project galleries and the inspiration gallery

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::commands::utils::{display_ref, print_done, print_not_saved, print_structured};
use crate::cli::helpers::today;
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat, Session};
use crate::core::form::validate_image_upload;
use crate::entities::Photo;

#[derive(Subcommand, Debug)]
pub enum PhotoCommands {
    /// List photos of a project, or the inspiration gallery
    List(ListArgs),

    /// Add an image to a project gallery or the inspiration gallery
    Add(AddArgs),

    /// Remove a photo
    Remove(RemoveArgs),
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("filename", "FILE", 30),
    ColumnDef::new("caption", "CAPTION", 40),
    ColumnDef::new("project", "PROJECT", 30),
    ColumnDef::new("uploaded", "UPLOADED", 12),
];

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only photos of this project (ID, PROJ@N or title fragment)
    #[arg(long, short = 'p', conflicts_with = "inspiration")]
    pub project: Option<String>,

    /// Only the inspiration gallery
    #[arg(long)]
    pub inspiration: bool,
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Image file name or path
    pub file: String,

    /// Project gallery to add to (default: inspiration gallery)
    #[arg(long, short = 'p')]
    pub project: Option<String>,

    #[arg(long, short = 'c')]
    pub caption: Option<String>,

    /// Where the image lives (defaults to the file name)
    #[arg(long)]
    pub url: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct RemoveArgs {
    /// Photo ID, short ID (PHOTO@N) or caption fragment
    pub reference: String,
}

/// Run a photo subcommand
pub fn run(cmd: PhotoCommands, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    match cmd {
        PhotoCommands::List(args) => run_list(args, &session),
        PhotoCommands::Add(args) => run_add(args, &session),
        PhotoCommands::Remove(args) => run_remove(args, &session),
    }
}

fn run_list(args: ListArgs, session: &Session) -> Result<()> {
    let catalog = &session.catalog;
    let photos: Vec<&Photo> = if args.inspiration {
        catalog.inspiration()
    } else if let Some(reference) = args.project.as_deref() {
        let project = catalog.find_project(reference)?;
        catalog.photos_for(&project.id)
    } else {
        catalog.photos.iter().collect()
    };

    let format = session.format_or(OutputFormat::Tsv);
    if print_structured(&photos, format)? {
        return Ok(());
    }

    if photos.is_empty() {
        println!("No photos found.");
        return Ok(());
    }

    let refs = catalog.photo_refs();
    let rows: Vec<TableRow> = photos
        .iter()
        .map(|photo| {
            let project = match photo.project_id {
                Some(ref id) => catalog.project_title(id).to_string(),
                None => "(inspiration)".to_string(),
            };
            TableRow::new(photo.id.to_string(), &refs)
                .cell("filename", CellValue::Text(photo.filename.clone()))
                .cell("caption", CellValue::Text(photo.caption.clone()))
                .cell("project", CellValue::Text(project))
                .cell("uploaded", CellValue::Date(Some(photo.uploaded_at)))
        })
        .collect();

    let visible: Vec<&str> = COLUMNS.iter().map(|c| c.key).collect();
    TableFormatter::new(COLUMNS, "photo", "PHOTO").output(&rows, format, &visible);
    Ok(())
}

fn run_add(args: AddArgs, session: &Session) -> Result<()> {
    let file_name = std::path::Path::new(&args.file)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(&args.file)
        .to_string();
    validate_image_upload(&file_name)?;

    let project = match args.project.as_deref() {
        Some(reference) => Some(session.catalog.find_project(reference)?),
        None => None,
    };

    let mut photo = Photo::new(project.map(|p| p.id.clone()), file_name, today());
    photo.url = args.url.unwrap_or_else(|| args.file.clone());
    photo.caption = args.caption.unwrap_or_default();

    let catalog = session.catalog.with_photo(photo.clone());

    let format = session.format_or(OutputFormat::Auto);
    if print_structured(&photo, format)? {
        return Ok(());
    }
    let reference = display_ref(&catalog.photo_refs(), &photo.id);
    match format {
        OutputFormat::Id => println!("{}", photo.id),
        OutputFormat::ShortId => println!("{}", reference),
        _ => {
            print_done("Added", "photo", &reference, &photo.filename);
            let gallery = match project {
                Some(p) => format!("{} gallery", p.title),
                None => "inspiration gallery".to_string(),
            };
            let count = match photo.project_id {
                Some(ref id) => catalog.photos_for(id).len(),
                None => catalog.inspiration().len(),
            };
            println!("   {} · {} photo(s)", style(gallery).dim(), count);
            print_not_saved(session.quiet);
        }
    }
    Ok(())
}

fn run_remove(args: RemoveArgs, session: &Session) -> Result<()> {
    let photo = session.catalog.find_photo(&args.reference)?;
    let reference = display_ref(&session.catalog.photo_refs(), &photo.id);
    let catalog = session.catalog.without_photo(&photo.id)?;

    print_done("Removed", "photo", &reference, &photo.filename);
    println!("   {} photo(s) remain", catalog.photos.len());
    print_not_saved(session.quiet);
    Ok(())
}
