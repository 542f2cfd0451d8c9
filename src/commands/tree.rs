//! Tree inspection and maintenance commands.

use anyhow::Context;
use promptmenu::MenuNode;
use promptmenu::services::restore_defaults;
use promptmenu::storage::{MenuStore, load_or_seed};

/// Prints the tree as an indented outline.
pub fn cmd_list(store: &dyn MenuStore) -> anyhow::Result<()> {
    let tree = load_or_seed(store).context("failed to load menus")?;

    if tree.is_empty() {
        println!("(no menus)");
        return Ok(());
    }

    tree.walk(&mut |node, depth| {
        let indent = "  ".repeat(depth);
        match node {
            MenuNode::Folder(folder) => {
                println!("{indent}[folder] {} ({} items)", folder.name, folder.items.len());
            },
            MenuNode::Menu(menu) => {
                println!("{indent}[menu] {} ({})", menu.title, menu.context);
            },
            MenuNode::Separator(_) => println!("{indent}[separator] ----"),
        }
    });
    println!();
    println!("{} menus", tree.menu_count());
    Ok(())
}

/// Puts back missing default menus and saves the tree.
pub fn cmd_restore_defaults(store: &dyn MenuStore) -> anyhow::Result<()> {
    let mut tree = load_or_seed(store).context("failed to load menus")?;
    let restored = restore_defaults(&mut tree);
    store.save(&tree).context("failed to save menus")?;

    if restored > 0 {
        println!("Restored {restored} default menu items.");
    } else {
        println!("Nothing to restore.");
    }
    Ok(())
}
