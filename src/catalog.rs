//! Fixed catalog of relational algebra example queries.
//!
//! Every entry is a static SQL literal against the `tienda_online` schema.
//! Keys run contiguously from 1 and the slice order is the menu order.
//! Nothing typed by the user is ever spliced into `query_text`.

use serde::Serialize;

/// Conceptual group an entry belongs to. Used for the grouped `--list` view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    BasicOperators,
    Joins,
    Aggregation,
    Division,
    UniversalQuantifiers,
}

impl Section {
    pub fn title(&self) -> &'static str {
        match self {
            Section::BasicOperators => "OPERADORES BÁSICOS",
            Section::Joins => "REUNIONES / JOINS",
            Section::Aggregation => "AGRUPACIÓN Y AGREGACIÓN",
            Section::Division => "DIVISIÓN",
            Section::UniversalQuantifiers => "CUANTIFICADORES UNIVERSALES",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryDefinition {
    pub key: u32,
    pub section: Section,
    pub category_label: &'static str,
    pub description: &'static str,
    pub query_text: &'static str,
    /// Set on entries kept verbatim despite a known logical or syntax defect.
    pub known_defect: Option<&'static str>,
}

impl QueryDefinition {
    /// Menu line: `<key>. [<label>] <description>`.
    pub fn menu_line(&self) -> String {
        format!("{}. [{}] {}", self.key, self.category_label, self.description)
    }
}

const fn entry(
    key: u32,
    section: Section,
    category_label: &'static str,
    description: &'static str,
    query_text: &'static str,
) -> QueryDefinition {
    QueryDefinition { key, section, category_label, description, query_text, known_defect: None }
}

const fn defective(def: QueryDefinition, note: &'static str) -> QueryDefinition {
    QueryDefinition { known_defect: Some(note), ..def }
}

static REFERENCE: [QueryDefinition; 20] = [
    // --- basic operators ---
    entry(1, Section::BasicOperators, "σ Selección", "Clientes de la ciudad de CDMX",
        "SELECT * FROM clientes
WHERE ciudad = 'CDMX';"),
    entry(2, Section::BasicOperators, "π Proyección", "Nombres y correos de clientes",
        "SELECT nombre, correo FROM clientes;"),
    entry(3, Section::BasicOperators, "∪ Unión", "Personas que son clientes o empleados",
        "SELECT nombre FROM clientes
UNION
SELECT nombre FROM empleados;"),
    entry(4, Section::BasicOperators, "∩ Intersección", "Personas que son clientes y empleados",
        "SELECT nombre FROM clientes
INTERSECT
SELECT nombre FROM empleados;"),
    entry(5, Section::BasicOperators, "- Diferencia", "Clientes que no han realizado pedidos",
        "SELECT c.nombre
FROM clientes c
LEFT JOIN pedidos p ON c.id_cliente = p.id_cliente
WHERE p.id_pedido IS NULL;"),
    // --- joins ---
    entry(6, Section::Joins, "⨝ Join", "Pedidos con el nombre del cliente",
        "SELECT p.id_pedido, c.nombre
FROM pedidos p
JOIN clientes c ON p.id_cliente = c.id_cliente;"),
    entry(7, Section::Joins, "⟕ Left Join", "Clientes y sus pedidos (si existen)",
        "SELECT c.nombre, p.id_pedido
FROM clientes c
LEFT JOIN pedidos p ON c.id_cliente = p.id_cliente;"),
    entry(8, Section::Joins, "⟖ Right Join", "Productos y pedidos en los que aparecen",
        "SELECT pr.nombre, dp.id_pedido
FROM productos pr
LEFT JOIN detalle_pedido dp ON pr.id_producto = dp.id_producto;"),
    entry(9, Section::Joins, "⨝ Join", "Productos con su categoría",
        "SELECT pr.nombre, c.nombre AS categoria
FROM productos pr
JOIN categorias c ON pr.id_categoria = c.id_categoria;"),
    entry(10, Section::Joins, "⨝ Join", "Detalle de pedidos con nombre de producto",
        "SELECT dp.id_pedido, pr.nombre, dp.cantidad
FROM detalle_pedido dp
JOIN productos pr ON dp.id_producto = pr.id_producto;"),
    // --- grouping and aggregation ---
    entry(11, Section::Aggregation, "GROUP BY / COUNT", "Cantidad de pedidos por cliente",
        "SELECT c.nombre, COUNT(p.id_pedido) AS total_pedidos
FROM clientes c
JOIN pedidos p ON c.id_cliente = p.id_cliente
GROUP BY c.nombre;"),
    entry(12, Section::Aggregation, "GROUP BY / SUM", "Total gastado por cliente",
        "SELECT c.nombre, SUM(dp.cantidad * dp.precio_unitario) AS total_gastado
FROM clientes c
JOIN pedidos p ON c.id_cliente = p.id_cliente
JOIN detalle_pedido dp ON p.id_pedido = dp.id_pedido
GROUP BY c.nombre;"),
    entry(13, Section::Aggregation, "GROUP BY / AVG", "Precio promedio de productos por categoría",
        "SELECT c.nombre, AVG(pr.precio) AS promedio
FROM categorias c
JOIN productos pr ON c.id_categoria = pr.id_categoria
GROUP BY c.nombre;"),
    entry(14, Section::Aggregation, "HAVING", "Clientes con más de 3 pedidos",
        "SELECT c.nombre, COUNT(*) AS pedidos
FROM clientes c
JOIN pedidos p ON c.id_cliente = p.id_cliente
GROUP BY c.nombre
HAVING pedidos > 3;"),
    entry(15, Section::Aggregation, "MAX", "Producto más caro por categoría",
        "SELECT c.nombre, MAX(pr.precio) AS precio_max
FROM categorias c
JOIN productos pr ON c.id_categoria = pr.id_categoria
GROUP BY c.nombre;"),
    // --- division ---
    entry(16, Section::Division, "División", "Clientes que han comprado TODOS los productos de una categoría",
        "SELECT c.nombre
FROM clientes c
WHERE NOT EXISTS (
    SELECT pr.id_producto
    FROM productos pr
    WHERE pr.id_categoria = 1
    AND NOT EXISTS (
        SELECT *
        FROM pedidos p
        JOIN detalle_pedido dp ON p.id_pedido = dp.id_pedido
        WHERE p.id_cliente = c.id_cliente
        AND dp.id_producto = pr.id_producto
    )
);"),
    defective(
        entry(17, Section::Division, "División", "Proveedores que surten todos los productos que venden",
            "SELECT pr.nombre
FROM proveedores pr
WHERE NOT EXISTS (
    SELECT p.id_producto
    FROM productos p
    WHERE p.id_proveedor = pr.id_proveedor
    AND p.stock = 0
);"),
        "filters on stock = 0, which selects suppliers with no out-of-stock product rather than a division",
    ),
    defective(
        entry(18, Section::Division, "División", "Clientes que han comprado todos los productos disponibles",
            "SELECT c.nombre
FROM clientes c
WHERE NOT EXISTS (
    SELECT p.id_producto
    FROM productos p
    AND NOT EXISTS (
        SELECT *
        FROM pedidos pe
        JOIN detalle_pedido dp ON pe.id_pedido = dp.id_pedido
        WHERE pe.id_cliente = c.id_cliente
        AND dp.id_producto = p.id_producto
    )
);"),
        "inner subquery has a dangling AND with no WHERE clause; the server rejects it",
    ),
    // --- universal quantifiers ---
    entry(19, Section::UniversalQuantifiers, "∀ Para todo", "Productos que siempre se han vendido",
        "SELECT pr.nombre
FROM productos pr
WHERE NOT EXISTS (
    SELECT *
    FROM pedidos p
    WHERE NOT EXISTS (
        SELECT *
        FROM detalle_pedido dp
        WHERE dp.id_pedido = p.id_pedido
        AND dp.id_producto = pr.id_producto
    )
);"),
    entry(20, Section::UniversalQuantifiers, "∀ Para todo", "Clientes cuyos pedidos siempre han sido enviados",
        "SELECT c.nombre
FROM clientes c
WHERE NOT EXISTS (
    SELECT *
    FROM pedidos p
    JOIN envios e ON p.id_pedido = e.id_pedido
    WHERE p.id_cliente = c.id_cliente
    AND e.estado != 'Enviado'
);"),
];

/// Immutable, ordered view over the query definitions.
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    entries: &'static [QueryDefinition],
}

impl Catalog {
    /// The 20-entry catalog shipped with the tool.
    pub fn reference() -> Self {
        Self { entries: &REFERENCE }
    }

    /// Keys are contiguous from 1, so the slot is `key - 1`. 0 is the exit
    /// sentinel and never resolves.
    pub fn lookup(&self, key: u32) -> Option<&'static QueryDefinition> {
        if key == 0 { return None; }
        let def = self.entries.get((key - 1) as usize)?;
        debug_assert_eq!(def.key, key);
        Some(def)
    }

    pub fn entries(&self) -> &'static [QueryDefinition] {
        self.entries
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Entries grouped by section, preserving registration order.
    pub fn sections(&self) -> Vec<(Section, Vec<&'static QueryDefinition>)> {
        let mut out: Vec<(Section, Vec<&'static QueryDefinition>)> = Vec::new();
        for def in self.entries {
            match out.last_mut() {
                Some((section, defs)) if *section == def.section => defs.push(def),
                _ => out.push((def.section, vec![def])),
            }
        }
        out
    }
}

impl Default for Catalog {
    fn default() -> Self { Self::reference() }
}
